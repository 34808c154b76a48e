//! Build script for pinmap-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates pins.toml and turns it into constants for the firmware

use std::collections::BTreeMap;
use std::env;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use pinmap_core::config::PinSpec;

/// Where a board pin has to live
#[derive(Clone, Copy)]
enum Kind {
    Gpio,
    Expander,
}

/// Pins the firmware expects, with the constant each becomes
const REQUIRED_PINS: [(&str, &str, Kind); 4] = [
    ("led", "LED_PIN", Kind::Gpio),
    ("aux_led", "AUX_LED_PIN", Kind::Gpio),
    ("status", "STATUS_PIN", Kind::Expander),
    ("button", "BUTTON_PIN", Kind::Expander),
];

/// GPIO pads on the RP2040
const RP2040_GPIO_COUNT: u8 = 30;

/// Pads wired to the expander's I2C bus (SDA, SCL)
const I2C_PADS: [u8; 2] = [4, 5];

/// Pins on the PCF8574
const EXPANDER_PINS: u8 = 8;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    setup_linker(&out_dir);
    generate_pins(&out_dir);
}

/// Set up linker search paths and scripts
fn setup_linker(out_dir: &Path) {
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Check every pin in pins.toml and write them out as `&str` constants
fn generate_pins(out_dir: &Path) {
    println!("cargo:rerun-if-changed=pins.toml");

    let content = fs::read_to_string("pins.toml")
        .unwrap_or_else(|e| fail("Failed to read pins.toml", &[e.to_string()]));
    let config: toml::Table = content
        .parse()
        .unwrap_or_else(|e: toml::de::Error| fail("Invalid TOML in pins.toml", &[e.to_string()]));

    let pins = match config.get("pins") {
        Some(toml::Value::Table(t)) => t,
        _ => fail("Missing [pins] section in pins.toml", &[]),
    };

    let mut errors = Vec::new();
    let mut specs = BTreeMap::new();
    for (name, value) in pins {
        let Some(text) = value.as_str() else {
            errors.push(format!("{} must be a string", name));
            continue;
        };
        match text.parse::<PinSpec>() {
            Ok(spec) => {
                specs.insert(name.as_str(), (text, spec));
            }
            Err(e) => errors.push(format!("{} = \"{}\": {}", name, text, e)),
        }
    }

    let mut pads = Vec::new();
    for (name, _, kind) in REQUIRED_PINS {
        let Some((text, spec)) = specs.get(name) else {
            if !pins.contains_key(name) {
                errors.push(format!("missing pin '{}'", name));
            }
            continue;
        };
        match kind {
            Kind::Gpio => match spec.gpio_pin() {
                Some(pad) if pad >= RP2040_GPIO_COUNT => {
                    errors.push(format!("{} = \"{}\": RP2040 has no GPIO {}", name, text, pad))
                }
                Some(pad) if I2C_PADS.contains(&pad) => {
                    errors.push(format!("{} = \"{}\": GPIO {} is used by I2C0", name, text, pad))
                }
                Some(pad) if pads.contains(&pad) => {
                    errors.push(format!("{} = \"{}\": GPIO {} is assigned twice", name, text, pad))
                }
                Some(pad) => pads.push(pad),
                None => errors.push(format!("{} = \"{}\": must be a gpio pin", name, text)),
            },
            Kind::Expander => match spec.expander_bit() {
                Some(bit) if bit >= EXPANDER_PINS => {
                    errors.push(format!("{} = \"{}\": expander has no pin {}", name, text, bit))
                }
                Some(_) => {}
                None => errors.push(format!("{} = \"{}\": must be an expander pin", name, text)),
            },
        }
    }
    if !errors.is_empty() {
        fail("Invalid pin configuration", &errors);
    }

    let mut code = String::new();
    for (name, constant, _) in REQUIRED_PINS {
        writeln!(code, "const {}: &str = {:?};", constant, specs[name].0).unwrap();
    }
    fs::write(out_dir.join("pins.rs"), code).unwrap();
}

fn fail(title: &str, details: &[String]) -> ! {
    let mut msg = format!("\n  ERROR: {}\n", title);
    for line in details {
        msg.push_str(&format!("    - {}\n", line));
    }
    panic!("{}", msg);
}

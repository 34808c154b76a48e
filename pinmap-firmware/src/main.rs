//! Pinmap demo firmware
//!
//! Runs on an RP2040 board with a PCF8574 expander on I2C0 (SDA = GPIO4,
//! SCL = GPIO5). Physical and virtual pins are configured from the pin
//! specifications in `pins.toml` and then driven only through their
//! numbers. The default board file has:
//!
//! - `gpio.25` - on-board LED, a physical pin
//! - `gpio.15:low` - auxiliary LED, wrapped and given a synthetic number
//! - `expander.0:low` - status LED on the expander
//! - `expander.1:pu` - push button on the expander
//! - a simulated pin that mirrors the button, for loop-back checks
//!
//! GPIO pads are taken from a [`PinBank`] by the configured number, so
//! editing `pins.toml` is enough to move a pin.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::i2c::{self, I2c};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pinmap_core::config::PinSpec;
use pinmap_core::{mode, GpioDispatch, PinAttributes, PinMapper, PinNum, PinRegistry, VirtualPin};
use pinmap_drivers::expander::{DEFAULT_ADDRESS, EXPANDER_PINS};
use pinmap_drivers::{ExpanderPin, HalI2c, PortExpander, SharedPin, SimulatedPin};
use pinmap_hal::i2c::EXPANDER_BUS_HZ;
use pinmap_hal_rp2040::{FlexPin, PinBank, RpGpio};

type Registry = PinRegistry<'static, CriticalSectionRawMutex>;
type Mapper = PinMapper<'static, 'static, CriticalSectionRawMutex>;

// Board pin assignments, generated from pins.toml
include!(concat!(env!("OUT_DIR"), "/pins.rs"));

/// Blink period in milliseconds
const BLINK_INTERVAL_MS: u64 = 250;

static REGISTRY: Registry = PinRegistry::new();
static EXPANDER: PortExpander<CriticalSectionRawMutex> = PortExpander::new(DEFAULT_ADDRESS);
static MIRROR: SimulatedPin = SimulatedPin::new();

static EXPANDER_BITS: StaticCell<[ExpanderPin<'static, CriticalSectionRawMutex>; EXPANDER_PINS as usize]> =
    StaticCell::new();
static AUX_LED: StaticCell<SharedPin<CriticalSectionRawMutex, FlexPin<'static>>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Pinmap firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // GPIO4/GPIO5 stay out of the bank: they carry I2C0
    let mut bank = PinBank::new([
        Some(p.PIN_0.into()),
        Some(p.PIN_1.into()),
        Some(p.PIN_2.into()),
        Some(p.PIN_3.into()),
        None,
        None,
        Some(p.PIN_6.into()),
        Some(p.PIN_7.into()),
        Some(p.PIN_8.into()),
        Some(p.PIN_9.into()),
        Some(p.PIN_10.into()),
        Some(p.PIN_11.into()),
        Some(p.PIN_12.into()),
        Some(p.PIN_13.into()),
        Some(p.PIN_14.into()),
        Some(p.PIN_15.into()),
        Some(p.PIN_16.into()),
        Some(p.PIN_17.into()),
        Some(p.PIN_18.into()),
        Some(p.PIN_19.into()),
        Some(p.PIN_20.into()),
        Some(p.PIN_21.into()),
        Some(p.PIN_22.into()),
        Some(p.PIN_23.into()),
        Some(p.PIN_24.into()),
        Some(p.PIN_25.into()),
        Some(p.PIN_26.into()),
        Some(p.PIN_27.into()),
        Some(p.PIN_28.into()),
        Some(p.PIN_29.into()),
    ]);

    let led = parse_spec(LED_PIN);
    let aux_led = parse_spec(AUX_LED_PIN);
    let status = parse_spec(STATUS_PIN);
    let button = parse_spec(BUTTON_PIN);

    // Physical bank
    let mut gpio = RpGpio::new();
    let led_num = gpio_num(&led);
    unwrap!(gpio.insert(led_num, unwrap!(bank.take(led_num))));

    // Virtual pins
    let bits: &'static [ExpanderPin<'static, CriticalSectionRawMutex>; EXPANDER_PINS as usize] =
        EXPANDER_BITS.init(core::array::from_fn(|bit| unwrap!(EXPANDER.pin(bit as u8))));
    let aux_pad = unwrap!(bank.take(gpio_num(&aux_led)));
    let aux: &'static SharedPin<CriticalSectionRawMutex, FlexPin<'static>> =
        AUX_LED.init(SharedPin::new(FlexPin::output(aux_pad)));

    aux.set_attributes(aux_led.attributes | PinAttributes::OUTPUT);
    let aux_map = Mapper::new(&REGISTRY, aux);

    let status_pin = expander_pin(bits, &status);
    status_pin.set_attributes(status.attributes | PinAttributes::OUTPUT);
    let status_map = Mapper::new(&REGISTRY, status_pin);

    let button_map = Mapper::new(&REGISTRY, expander_pin(bits, &button));
    let mirror_map = Mapper::new(&REGISTRY, &MIRROR);

    let aux_num = pin_num(&aux_map);
    let status_num = pin_num(&status_map);
    let button_num = pin_num(&button_map);
    let mirror_num = pin_num(&mirror_map);
    info!(
        "Mapped aux={} status={} button={} mirror={} ({} of {} slots)",
        aux_num,
        status_num,
        button_num,
        mirror_num,
        REGISTRY.claimed(),
        REGISTRY.capacity()
    );

    // Everything below only uses pin numbers
    let mut dispatch = GpioDispatch::new(gpio, &REGISTRY);
    dispatch.pin_mode(led_num, mode::OUTPUT);
    dispatch.pin_mode(button_num, (button.attributes | PinAttributes::INPUT).to_mode_bits());
    dispatch.pin_mode(mirror_num, mode::OUTPUT);

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = EXPANDER_BUS_HZ;
    let mut bus = HalI2c(I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config));

    let mut ticker = Ticker::every(Duration::from_millis(BLINK_INTERVAL_MS));
    let mut on = false;

    loop {
        ticker.next().await;
        on = !on;

        if let Err(e) = EXPANDER.refresh(&mut bus) {
            warn!("Expander read failed: {:?}", e);
        }
        let pressed = !dispatch.digital_read(button_num);

        dispatch.digital_write(led_num, on);
        dispatch.digital_write(aux_num, !on);
        dispatch.digital_write(status_num, pressed);
        dispatch.digital_write(mirror_num, pressed);

        if dispatch.digital_read(mirror_num) != pressed {
            error!("Mirror pin {} out of sync", mirror_num);
        }

        match EXPANDER.flush(&mut bus) {
            Ok(true) => trace!("Expander updated"),
            Ok(false) => {}
            Err(e) => warn!("Expander write failed: {:?}", e),
        }
    }
}

fn parse_spec(s: &str) -> PinSpec {
    match s.parse() {
        Ok(spec) => spec,
        Err(e) => defmt::panic!("Bad pin spec {=str}: {}", s, e),
    }
}

fn gpio_num(spec: &PinSpec) -> PinNum {
    match spec.gpio_pin() {
        Some(num) => num,
        None => defmt::panic!("Expected a GPIO pin, got {}", spec),
    }
}

fn expander_pin(
    bits: &'static [ExpanderPin<'static, CriticalSectionRawMutex>],
    spec: &PinSpec,
) -> &'static ExpanderPin<'static, CriticalSectionRawMutex> {
    let Some(bit) = spec.expander_bit() else {
        defmt::panic!("Expected an expander pin, got {}", spec);
    };
    match bits.get(bit as usize) {
        Some(pin) => pin,
        None => defmt::panic!("Expander has no pin {}", bit),
    }
}

fn pin_num(mapper: &Mapper) -> PinNum {
    unwrap!(mapper.pin_num())
}

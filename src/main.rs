#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;

use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, SPI1};
use embassy_rp::spi::{self, Phase, Polarity, Spi};
use embassy_embedded_hal::shared_bus::blocking::i2c::I2cDevice;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Delay, Duration, Ticker, Timer};

use display_interface_spi::SPIInterface;
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;

use {defmt_rtt as _, panic_probe as _};

use thermo_rs::control::Thermostat;
use thermo_rs::ds1307::Ds1307;
use thermo_rs::eeprom::At24c;
use thermo_rs::keypad::MatrixKeypad;
use thermo_rs::sampler::Sampler;
use thermo_rs::sensor::{AnalogFrontEnd, LinearCalibration, TemperatureSensor};
use thermo_rs::sh1107::Sh1107;
use thermo_rs::state::{Mode, SharedState};
use thermo_rs::timeout::{self, TimeoutTimer};
use thermo_rs::{CONTROL_PERIOD_MS, SAMPLE_PERIOD_MS, TIMEOUT_TICKS, TIMEOUT_TICK_MS};

type I2cBus = I2c<'static, I2C0, i2c::Blocking>;
type SharedI2c = I2cDevice<'static, CriticalSectionRawMutex, I2cBus>;
type Display = Sh1107<SPIInterface<ExclusiveDevice<Spi<'static, SPI1, spi::Blocking>, Output<'static>, Delay>, Output<'static>>, Output<'static>>;

/// Display and clock, shared by the sampling task and the control loop.
struct Devices {
    display: Display,
    clock: Ds1307<SharedI2c>,
}

static STATE: SharedState = SharedState::new();
static TIMEOUT: TimeoutTimer = TimeoutTimer::new(TIMEOUT_TICKS);

static I2C_BUS: StaticCell<BlockingMutex<CriticalSectionRawMutex, RefCell<I2cBus>>> = StaticCell::new();
static DEVICES: StaticCell<Mutex<CriticalSectionRawMutex, Devices>> = StaticCell::new();

/// LM35 on ADC0.
struct Lm35 {
    adc: Adc<'static, adc::Blocking>,
    channel: Channel<'static>,
}

impl AnalogFrontEnd for Lm35 {
    type Error = adc::Error;

    fn sample_raw(&mut self) -> Result<u16, adc::Error> {
        self.adc.blocking_read(&mut self.channel)
    }
}

#[embassy_executor::task]
async fn timeout_task() {
    let mut ticker = Ticker::every(Duration::from_millis(TIMEOUT_TICK_MS as u64));
    loop {
        timeout::service(&TIMEOUT, &STATE);
        ticker.next().await;
    }
}

#[embassy_executor::task]
async fn sampling_task(devices: &'static Mutex<CriticalSectionRawMutex, Devices>, mut sampler: Sampler<Lm35, LinearCalibration>) {
    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_PERIOD_MS));
    loop {
        ticker.next().await;
        if STATE.mode() != Mode::Normal {
            continue;
        }
        let mut devs = devices.lock().await;
        let Devices { display, clock } = &mut *devs;
        if let Err(e) = sampler.on_tick(&STATE, display, clock) {
            warn!("sampling tick failed: {}", e);
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Program start");
    let p = embassy_rp::init(Default::default());
    let mut delay = Delay;

    // Display pins
    let dc = Output::new(p.PIN_8, Level::Low); // Data/Command
    let cs = Output::new(p.PIN_9, Level::High); // Chip Select
    let sclk = p.PIN_10; // Serial Clock
    let mosi = p.PIN_11; // Master Out Slave In
    let rst = Output::new(p.PIN_12, Level::Low); // Reset

    let mut spi_config = spi::Config::default();
    spi_config.frequency = 2_000_000;
    spi_config.phase = Phase::CaptureOnSecondTransition;
    spi_config.polarity = Polarity::IdleHigh;

    let spi = Spi::new_blocking_txonly(p.SPI1, sclk, mosi, spi_config);
    let spi_device = unwrap!(ExclusiveDevice::new(spi, cs, Delay));
    let mut display = Sh1107::new(SPIInterface::new(spi_device, dc), rst);
    if display.init(&mut delay).is_err() {
        error!("display init failed");
    }

    // Clock chip and EEPROM share I2C0
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let bus: &'static _ = I2C_BUS.init(BlockingMutex::new(RefCell::new(i2c)));
    let clock = Ds1307::new(I2cDevice::new(bus));
    let eeprom = At24c::new(I2cDevice::new(bus), Delay);

    // Keypad: rows driven, columns pulled up
    let rows = [
        Output::new(p.PIN_16, Level::High),
        Output::new(p.PIN_17, Level::High),
        Output::new(p.PIN_18, Level::High),
        Output::new(p.PIN_19, Level::High),
    ];
    let cols = [
        Input::new(p.PIN_20, Pull::Up),
        Input::new(p.PIN_21, Pull::Up),
        Input::new(p.PIN_22, Pull::Up),
    ];
    let keypad = unwrap!(MatrixKeypad::new(rows, cols));

    let heater = Output::new(p.PIN_15, Level::Low);

    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let channel = Channel::new_pin(p.PIN_26, Pull::None);
    let sensor = TemperatureSensor::new(Lm35 { adc, channel }, LinearCalibration::LM35_12BIT_3V3);

    let devices: &'static _ = DEVICES.init(Mutex::new(Devices { display, clock }));

    unwrap!(spawner.spawn(timeout_task()));
    unwrap!(spawner.spawn(sampling_task(devices, Sampler::new(sensor))));

    let mut thermostat = Thermostat::new(&STATE, &TIMEOUT, keypad, eeprom, heater);
    {
        let mut devs = devices.lock().await;
        let Devices { display, clock } = &mut *devs;
        if let Err(e) = thermostat.boot(display, clock, &mut delay).await {
            error!("boot failed: {}", e);
        }
    }

    info!("Begin loop logic");
    loop {
        {
            let mut devs = devices.lock().await;
            if let Err(e) = thermostat.step(&mut devs.display, &mut delay).await {
                warn!("control step failed: {}", e);
            }
        }
        Timer::after_millis(CONTROL_PERIOD_MS).await;
    }
}

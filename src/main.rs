#![no_std]
#![no_main]

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Core
use core::sync::atomic::{AtomicU8, Ordering};

// Device
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{AnyPin, Input, Level, Output, OutputDrive, Pin, Pull},
    peripherals::{SPI2, TWISPI1},
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
    twim::{self, Twim},
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Channel, signal::Signal};
use embassy_time::{Duration, Instant, Ticker, Timer};

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM1_SPIS1_TWIM1_TWIS1_SPI1_TWI1 => twim::InterruptHandler<TWISPI1>;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use pinetime_watchface::{
    event::{ReversionTimer, TimerHandle, WatchEvent},
    gesture::FlickDetector,
    peripherals::{
        accelerometer::{self, Bma421},
        backlight::Backlight,
        battery::{BatteryStatus, ChargeGauge},
        display::Display,
    },
    system::{
        config::SystemConfig,
        time::{until_next_minute, TimeManager, TimeReference},
    },
    ui::Watchface,
    ViewController, WatchfaceConfig,
};

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

// Communication channels
static EVENTS: Channel<ThreadModeRawMutex, WatchEvent, 8> = Channel::new();
static REVERT: Signal<ThreadModeRawMutex, (TimerHandle, Duration)> = Signal::new();
static BATTERY_PERCENT: AtomicU8 = AtomicU8::new(0);

/// Reversion timer backed by the `revert_timer` task
struct SignalTimer {
    next: u32,
}

impl ReversionTimer for SignalTimer {
    fn schedule(&mut self, after: Duration) -> TimerHandle {
        self.next = self.next.wrapping_add(1);
        let handle = TimerHandle(self.next);
        REVERT.signal((handle, after));
        handle
    }
}

/// Last battery level published by `update_battery_status`
struct SharedGauge;

impl ChargeGauge for SharedGauge {
    fn charge_percent(&self) -> u8 {
        BATTERY_PERCENT.load(Ordering::Relaxed)
    }
}

/// Fetch the battery status from the hardware.
#[embassy_executor::task(pool_size = 1)]
async fn update_battery_status(mut battery: BatteryStatus<'static>) {
    loop {
        match battery.update().await {
            Ok(true) => {
                let info = battery.info();
                defmt::info!(
                    "Battery status: {}% ({})",
                    info.percent,
                    if info.charging {
                        "charging"
                    } else {
                        "discharging"
                    }
                );
                BATTERY_PERCENT.store(info.percent, Ordering::Relaxed);
            }
            Ok(false) => {}
            Err(e) => defmt::warn!("Battery measurement failed: {}", e),
        }

        // Re-schedule the timer interrupt in 10s
        Timer::after(Duration::from_secs(10)).await;
    }
}

/// Emit a tick at the start of every minute, and once at boot.
#[embassy_executor::task(pool_size = 1)]
async fn minute_ticker(clock: TimeManager) {
    loop {
        match clock.now() {
            Ok(now) => {
                EVENTS.send(WatchEvent::MinuteTick(now)).await;
                Timer::after(until_next_minute(&now)).await;
            }
            Err(e) => {
                defmt::warn!("Clock out of range: {}", e);
                Timer::after(Duration::from_secs(60)).await;
            }
        }
    }
}

/// Polls the accelerometer every 20ms
#[embassy_executor::task(pool_size = 1)]
async fn poll_accelerometer(mut accel: Bma421<Twim<'static, TWISPI1>>, mut detector: FlickDetector) {
    let mut tick = Ticker::every(Duration::from_millis(20));
    loop {
        match accel.read_sample() {
            Ok(sample) => {
                if let Some(tap) = detector.update(Instant::now().as_millis(), &sample) {
                    EVENTS.send(WatchEvent::Tap(tap)).await;
                }
            }
            Err(e) => defmt::warn!("Accelerometer read failed: {}", e),
        }

        tick.next().await;
    }
}

/// Sleep for each scheduled reversion, then report it.
#[embassy_executor::task(pool_size = 1)]
async fn revert_timer() {
    loop {
        let (handle, after) = REVERT.wait().await;
        Timer::after(after).await;
        EVENTS.send(WatchEvent::RevertTimeout(handle)).await;
    }
}

/// Owns the controller; handles events one at a time and redraws.
#[embassy_executor::task(pool_size = 1)]
async fn run_watchface(
    mut display: Display<'static>,
    _backlight: Backlight<Output<'static, AnyPin>>,
    config: WatchfaceConfig,
) {
    let mut controller =
        ViewController::new(Watchface::new(), SignalTimer { next: 0 }, SharedGauge, config);

    loop {
        let event = EVENTS.receive().await;
        defmt::debug!("Event: {}", event);

        match controller.handle(event) {
            Ok(true) => {
                if let Err(e) = display.render(controller.face()) {
                    defmt::warn!("Redraw failed: {}", e);
                }
            }
            Ok(false) => {}
            Err(e) => defmt::warn!("Event dropped: {}", e),
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::new());
    let config = WatchfaceConfig::default();
    defmt::info!("Initializing");

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initialize Backlight
    let backlight = unwrap!(Backlight::init(
        Output::new(p.P0_14.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_22.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_23.degrade(), Level::High, OutputDrive::Standard),
        config.brightness,
    ));

    // Initalize Battery
    let battery = unwrap!(BatteryStatus::init(Input::new(p.P0_12, Pull::None), saadc).await);
    BATTERY_PERCENT.store(battery.info().percent, Ordering::Relaxed);

    // Initialize I2C
    let mut i2c_config = twim::Config::default();
    // Use I2C at 400KHz (the fastest clock available on the nRF52832),
    i2c_config.frequency = twim::Frequency::K400;

    let i2c = Twim::new(p.TWISPI1, Irqs, p.P0_06, p.P0_07, i2c_config);

    // Initialize accelerometer
    let accel = unwrap!(Bma421::new(i2c, accelerometer::DEFAULT_I2C_ADDR));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::High, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
    ));

    // Start the wall clock from the build time
    let mut clock = TimeManager::init(config.utc_offset);
    clock.set_time(unwrap!(TimeReference::from_timestamp(UTC_EPOCH, Instant::now())));

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(run_watchface(display, backlight, config)));
    unwrap!(spawner.spawn(revert_timer()));
    unwrap!(spawner.spawn(update_battery_status(battery)));
    unwrap!(spawner.spawn(poll_accelerometer(
        accel,
        FlickDetector::from_config(&config)
    )));
    unwrap!(spawner.spawn(minute_ticker(clock)));
}

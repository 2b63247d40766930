#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_time::{Duration, Instant, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::rng::Rng;
use esp_hal::time::Duration as HalDuration;
use esp_hal::timer::timg::{MwdtStage, TimerGroup};
use log::{info, warn};
use static_cell::StaticCell;

use embassy_net::StackResources;
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use mipidsi::interface::SpiInterface;
use mipidsi::options::{Orientation, Rotation};
use mipidsi::{Builder as MipidsiBuilder, models::ILI9341Rgb565};

use rinkside_core::config::{CONNECTION_TIMEOUT_MS, WATCHDOG_TIMEOUT_MS};
use rinkside_core::model::PanelData;
use rinkside_core::nav::{ItemCounts, NavOutcome, Navigator, Screen};
use rinkside_core::pages::{self, NetStatus};
use rinkside_core::touch::calibration::CalibrationTransform;
use rinkside_core::touch::{CalibrationWizard, MappingStrategy, TouchDispatcher, WizardEvent};

use rinkside_firmware::flash_store::FlashKvStore;
use rinkside_firmware::net;
use rinkside_firmware::xpt2046::Xpt2046;

const DISPLAY_WIDTH: u16 = 240;
const DISPLAY_HEIGHT: u16 = 320;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
esp_bootloader_esp_idf::esp_app_desc!();

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 72 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("rinkside panel starting");

    // Liveness watchdog; the UI loop must feed it every iteration.
    let timg1 = TimerGroup::new(peripherals.TIMG1);
    let mut wdt = timg1.wdt;
    wdt.set_timeout(MwdtStage::Stage0, HalDuration::from_millis(WATCHDOG_TIMEOUT_MS));
    wdt.enable();

    // Settings live in the last flash sector.
    let mut store = FlashKvStore::new(peripherals.FLASH);
    let mut cal = CalibrationTransform::load(&mut store);

    // Wi-Fi and the network stack.
    static RADIO_CTRL: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
    static STACK_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();

    let radio_ctrl =
        RADIO_CTRL.init(esp_radio::init().expect("Failed to initialize Wi-Fi controller"));
    let (wifi_controller, interfaces) =
        esp_radio::wifi::new(radio_ctrl, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi interface");

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;
    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        STACK_RESOURCES.init(StackResources::<3>::new()),
        seed,
    );

    spawner.must_spawn(net::connection_task(wifi_controller));
    spawner.must_spawn(net::net_task(runner));
    spawner.must_spawn(net::fetch_task(stack));

    // TFT on SPI2. The panel is mounted landscape, so the native portrait
    // frame is rotated 90 degrees.
    let tft_spi = Spi::new(peripherals.SPI2, SpiConfig::default())
        .unwrap()
        .with_sck(peripherals.GPIO14)
        .with_mosi(peripherals.GPIO13);
    let tft_cs = Output::new(peripherals.GPIO15, Level::High, OutputConfig::default());
    let tft_device = ExclusiveDevice::new_no_delay(tft_spi, tft_cs).unwrap();
    let dc = Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default());

    static SPI_BUFFER: StaticCell<[u8; 512]> = StaticCell::new();
    let spi_buffer = SPI_BUFFER.init([0; 512]);
    let di = SpiInterface::new(tft_device, dc, spi_buffer);

    let mut display = MipidsiBuilder::new(ILI9341Rgb565, di)
        .display_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .init(&mut embassy_time::Delay)
        .expect("Failed to initialize display");

    let _backlight = Output::new(peripherals.GPIO21, Level::High, OutputConfig::default());

    // Touch controller on its own SPI bus.
    let touch_spi = Spi::new(peripherals.SPI3, SpiConfig::default())
        .unwrap()
        .with_sck(peripherals.GPIO25)
        .with_mosi(peripherals.GPIO32)
        .with_miso(peripherals.GPIO39);
    let touch_cs = Output::new(peripherals.GPIO33, Level::High, OutputConfig::default());
    let touch_device = ExclusiveDevice::new_no_delay(touch_spi, touch_cs).unwrap();
    let touch_irq = Input::new(
        peripherals.GPIO36,
        InputConfig::default().with_pull(Pull::None),
    );
    let mut touch = Xpt2046::new(touch_device, touch_irq);

    info!("display and touch initialized");

    let mut dispatcher = TouchDispatcher::new(MappingStrategy::Calibrated);
    let mut wizard = CalibrationWizard::new();
    let mut nav = Navigator::new();
    let mut data = PanelData::default();
    let mut fetch_updates = net::FETCH_UPDATES.receiver().expect("watch receiver");

    let mut last_success: Option<Instant> = None;
    let mut connection_ok = false;
    let mut dirty = true;

    // A wiped or never-written store means the panel has never been
    // calibrated; walk the user through the wizard before anything else.
    // Stored values are trusted even when the valid flag is unset.
    if cal.is_factory_default() {
        info!("first start, entering calibration");
        nav.go_to(Screen::Calibrate);
        wizard.start();
    }

    loop {
        wdt.feed();

        if let Some(update) = fetch_updates.try_changed() {
            connection_ok = update.data.is_some();
            if let Some(fresh) = update.data {
                data = fresh;
                last_success = Some(update.at);
            }
            // Detail screens keep their content stable while open.
            if !matches!(
                nav.state.current,
                Screen::Settings | Screen::Calibrate | Screen::TeamDetail
            ) {
                dirty = true;
            }
        }

        let now_ms = Instant::now().as_millis();
        let raw = touch.sample();

        if nav.state.current == Screen::Calibrate {
            match wizard.poll(now_ms, raw, &mut cal, &mut store) {
                WizardEvent::Redraw => dirty = true,
                WizardEvent::Cancelled => {
                    nav.go_to(Screen::Settings);
                    dirty = true;
                }
                WizardEvent::Completed => {
                    nav.go_to(Screen::StandingsShl);
                    dirty = true;
                }
                WizardEvent::None => {}
            }
        } else if let Some(event) = dispatcher.poll(now_ms, raw, &cal) {
            let counts = ItemCounts {
                shl_teams: data.shl.len(),
                allsvenskan_teams: data.allsvenskan.len(),
                upcoming_matches: data.upcoming_count(),
                news: data.news.len(),
            };
            match nav.handle_event(event, &counts) {
                NavOutcome::Changed => dirty = true,
                NavOutcome::StartWizard => {
                    wizard.start();
                    dirty = true;
                }
                NavOutcome::Ignored => {}
            }
        }

        if dirty {
            let (timed_out, offline_minutes) = staleness(last_success);
            let status = NetStatus {
                connection_ok,
                timed_out,
                offline_minutes,
                wifi_connected: stack.is_link_up(),
            };
            if pages::draw_screen(&mut display, &nav.state, &data, &status, &cal, &wizard).is_err()
            {
                warn!("screen draw failed");
            }
            dirty = false;
        }

        Timer::after(Duration::from_millis(5)).await;
    }
}

/// Whether data has gone stale, and for how many minutes.
fn staleness(last_success: Option<Instant>) -> (bool, u64) {
    match last_success {
        Some(at) => {
            let elapsed = at.elapsed();
            (
                elapsed >= Duration::from_millis(CONNECTION_TIMEOUT_MS),
                elapsed.as_secs() / 60,
            )
        }
        // Never fetched; stale once the grace period after boot runs out.
        None => {
            let uptime = Instant::now();
            (
                uptime.as_millis() >= CONNECTION_TIMEOUT_MS,
                uptime.as_secs() / 60,
            )
        }
    }
}

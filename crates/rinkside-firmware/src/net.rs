//! Wi-Fi link management and backend polling.
//!
//! Three tasks: `connection_task` keeps the station associated and retries
//! on disconnect, `net_task` drives the embassy-net stack, and `fetch_task`
//! polls the backend's `/api/all` document on an adaptive cadence (faster
//! while a match is live, faster still after a failure). Parsed snapshots are
//! published through a [`Watch`]; the UI loop picks up the latest one on its
//! own schedule.

use embassy_net::{IpEndpoint, Ipv4Address, Runner, Stack, tcp::TcpSocket};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::watch::Watch;
use embassy_time::{Duration, Instant, Timer, with_timeout};
use embedded_io_async::Write;
use esp_radio::wifi::{
    AuthMethod, ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent,
};
use log::{info, warn};
use static_cell::StaticCell;

use rinkside_core::config::{
    FETCH_INTERVAL_ERROR_MS, FETCH_INTERVAL_LIVE_MS, FETCH_INTERVAL_MS, WIFI_CHECK_INTERVAL_MS,
};
use rinkside_core::model::{PanelData, parse_payload};

/// Station credentials, baked in at build time.
const WIFI_SSID: &str = match option_env!("RINKSIDE_WIFI_SSID") {
    Some(ssid) => ssid,
    None => "",
};
const WIFI_PASSWORD: &str = match option_env!("RINKSIDE_WIFI_PASSWORD") {
    Some(password) => password,
    None => "",
};

/// Backend serving the standings document.
const BACKEND_ADDR: Ipv4Address = Ipv4Address::new(192, 168, 1, 50);
const BACKEND_PORT: u16 = 8080;
const BACKEND_PATH: &str = "/api/all";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const RESPONSE_BUF_LEN: usize = 12 * 1024;

/// Result of one backend poll.
#[derive(Clone)]
pub struct FetchUpdate {
    /// Fresh snapshot on success, `None` on failure (keep showing the old
    /// one).
    pub data: Option<PanelData>,
    pub at: Instant,
}

/// Latest fetch outcome, for the UI loop to consume.
pub static FETCH_UPDATES: Watch<CriticalSectionRawMutex, FetchUpdate, 2> = Watch::new();

#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    let client = ClientConfig::default()
        .with_ssid(WIFI_SSID.into())
        .with_password(WIFI_PASSWORD.into())
        .with_auth_method(if WIFI_PASSWORD.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::Wpa2Personal
        });
    if let Err(err) = controller.set_config(&ModeConfig::Client(client)) {
        warn!("wifi config rejected: {err:?}");
        return;
    }

    loop {
        if !matches!(controller.is_started(), Ok(true)) {
            if let Err(err) = controller.start_async().await {
                warn!("wifi start failed: {err:?}");
                Timer::after(Duration::from_millis(WIFI_CHECK_INTERVAL_MS)).await;
                continue;
            }
        }

        match controller.connect_async().await {
            Ok(()) => {
                info!("wifi connected to {WIFI_SSID}");
                controller.wait_for_event(WifiEvent::StaDisconnected).await;
                warn!("wifi disconnected");
            }
            Err(err) => {
                warn!("wifi connect failed: {err:?}");
            }
        }
        Timer::after(Duration::from_millis(WIFI_CHECK_INTERVAL_MS)).await;
    }
}

#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}

#[embassy_executor::task]
pub async fn fetch_task(stack: Stack<'static>) {
    static RX_BUF: StaticCell<[u8; 4096]> = StaticCell::new();
    static TX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();
    static RESPONSE_BUF: StaticCell<[u8; RESPONSE_BUF_LEN]> = StaticCell::new();
    let rx_buf = RX_BUF.init([0; 4096]);
    let tx_buf = TX_BUF.init([0; 1024]);
    let response = RESPONSE_BUF.init([0; RESPONSE_BUF_LEN]);

    let sender = FETCH_UPDATES.sender();
    let mut live_match = false;

    loop {
        stack.wait_config_up().await;

        let result = with_timeout(FETCH_TIMEOUT, fetch_once(stack, rx_buf, tx_buf, response))
            .await
            .unwrap_or(Err("fetch timed out"));

        let interval = match result {
            Ok(data) => {
                live_match = data.live_match;
                info!(
                    "fetched {} + {} teams, {} matches, {} news",
                    data.shl.len(),
                    data.allsvenskan.len(),
                    data.matches.len(),
                    data.news.len()
                );
                sender.send(FetchUpdate {
                    data: Some(data),
                    at: Instant::now(),
                });
                if live_match {
                    FETCH_INTERVAL_LIVE_MS
                } else {
                    FETCH_INTERVAL_MS
                }
            }
            Err(err) => {
                warn!("fetch failed: {err}");
                sender.send(FetchUpdate {
                    data: None,
                    at: Instant::now(),
                });
                FETCH_INTERVAL_ERROR_MS
            }
        };
        Timer::after(Duration::from_millis(interval)).await;
    }
}

/// One GET round-trip against the backend.
async fn fetch_once(
    stack: Stack<'static>,
    rx_buf: &mut [u8],
    tx_buf: &mut [u8],
    response: &mut [u8],
) -> Result<PanelData, &'static str> {
    let mut socket = TcpSocket::new(stack, rx_buf, tx_buf);
    socket.set_timeout(Some(FETCH_TIMEOUT));

    socket
        .connect(IpEndpoint::new(BACKEND_ADDR.into(), BACKEND_PORT))
        .await
        .map_err(|_| "connect failed")?;

    let mut request: heapless::String<128> = heapless::String::new();
    core::fmt::Write::write_fmt(
        &mut request,
        format_args!(
            "GET {BACKEND_PATH} HTTP/1.0\r\nHost: {BACKEND_ADDR}\r\nConnection: close\r\n\r\n"
        ),
    )
    .map_err(|_| "request too long")?;
    socket
        .write_all(request.as_bytes())
        .await
        .map_err(|_| "write failed")?;

    // HTTP/1.0 with Connection: close; read until the server hangs up.
    let mut filled = 0;
    loop {
        if filled == response.len() {
            return Err("response too large");
        }
        match socket.read(&mut response[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(_) => return Err("read failed"),
        }
    }

    let raw = &response[..filled];
    let header_end = find_subslice(raw, b"\r\n\r\n").ok_or("no header terminator")?;
    let header = core::str::from_utf8(&raw[..header_end]).map_err(|_| "header not utf8")?;
    let status_ok = header
        .lines()
        .next()
        .is_some_and(|line| line.contains(" 200 "));
    if !status_ok {
        return Err("non-200 response");
    }

    let body = core::str::from_utf8(&raw[header_end + 4..]).map_err(|_| "body not utf8")?;
    parse_payload(body).map_err(|_| "malformed payload")
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

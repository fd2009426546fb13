//! Display actor loop
//!
//! Waits on the inbox and, while a power-off is pending, on its deadline.
//! Exactly one of them is handled per step, so messages stay in order and
//! the debounce timer can never fire twice.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embassy_time::{Instant, Timer};
use papyrus_core::{DisplayBackend, Message, Outbound};
use papyrus_hal::{PowerAuthority, SettingsStore};

use crate::service::EinkService;

/// Handle the next message or the power-off deadline, whichever comes first
pub async fn step<'a, D, S, A, M, const N: usize, const K: usize>(
    service: &mut EinkService<D, S, A>,
    inbox: &Receiver<'_, M, Message<'a>, N>,
    outbox: &Sender<'_, M, Outbound, K>,
) where
    D: DisplayBackend,
    S: SettingsStore,
    A: PowerAuthority,
    M: RawMutex,
{
    let event = match service.power_off_deadline() {
        Some(deadline) => select(inbox.receive(), Timer::at(Instant::from_millis(deadline))).await,
        None => Either::First(inbox.receive().await),
    };

    let now = Instant::now().as_millis();
    match event {
        Either::First(message) => {
            let reply = service.handle(message, now).await;
            service.settle(Instant::now().as_millis());
            if let Some(reply) = reply {
                outbox.send(reply).await;
            }
        }
        Either::Second(()) => service.on_power_off_timer(now).await,
    }
}

/// Run the display actor forever
pub async fn run<'a, D, S, A, M, const N: usize, const K: usize>(
    service: &mut EinkService<D, S, A>,
    inbox: Receiver<'_, M, Message<'a>, N>,
    outbox: Sender<'_, M, Outbound, K>,
) -> !
where
    D: DisplayBackend,
    S: SettingsStore,
    A: PowerAuthority,
    M: RawMutex,
{
    info!("display task running");
    loop {
        step(service, &inbox, &outbox).await;
    }
}

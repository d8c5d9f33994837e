//! Channel annunciator
//!
//! Several tasks announce events at once (the scan sequence and both
//! watchers). Each gets a copy of this sender; a single consumer task
//! drains the channel into the real annunciator. Sending never blocks
//! the scan: an event that does not fit is dropped with a warning.

use core::convert::Infallible;

use contour_core::events::ScanEvent;
use contour_core::traits::Annunciator;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Receiver, Sender};

/// Annunciator that forwards events into an embassy-sync channel
pub struct ChannelAnnunciator<'ch, M: RawMutex, const N: usize> {
    sender: Sender<'ch, M, ScanEvent, N>,
}

impl<'ch, M: RawMutex, const N: usize> ChannelAnnunciator<'ch, M, N> {
    pub fn new(sender: Sender<'ch, M, ScanEvent, N>) -> Self {
        Self { sender }
    }
}

impl<M: RawMutex, const N: usize> Clone for ChannelAnnunciator<'_, M, N> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<M: RawMutex, const N: usize> Annunciator for ChannelAnnunciator<'_, M, N> {
    async fn acknowledge(&mut self, event: ScanEvent) {
        if self.sender.try_send(event).is_err() {
            warn!("Annunciator queue full, dropping event");
        }
    }
}

/// Forward every queued event to `annunciator`, forever
pub async fn forward<M, A, const N: usize>(
    receiver: Receiver<'_, M, ScanEvent, N>,
    annunciator: &mut A,
) -> Infallible
where
    M: RawMutex,
    A: Annunciator,
{
    loop {
        let event = receiver.receive().await;
        annunciator.acknowledge(event).await;
    }
}

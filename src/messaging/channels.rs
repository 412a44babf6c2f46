// Communication channels, lock-free
// Producers never block: a full ring drops the message

use crate::messaging::command::Command;
use crate::messaging::notification::Notification;
use crate::messaging::update::TrackUpdate;
use ringbuf::{HeapRb, traits::Split};

pub type CommandProducer = ringbuf::HeapProd<Command>;
pub type CommandConsumer = ringbuf::HeapCons<Command>;

pub fn create_command_channel(capacity: usize) -> (CommandProducer, CommandConsumer) {
    let rb = HeapRb::<Command>::new(capacity);
    rb.split()
}

pub type UpdateProducer = ringbuf::HeapProd<TrackUpdate>;
pub type UpdateConsumer = ringbuf::HeapCons<TrackUpdate>;

pub fn create_update_channel(capacity: usize) -> (UpdateProducer, UpdateConsumer) {
    let rb = HeapRb::<TrackUpdate>::new(capacity);
    rb.split()
}

pub type NotificationProducer = ringbuf::HeapProd<Notification>;
pub type NotificationConsumer = ringbuf::HeapCons<Notification>;

pub fn create_notification_channel(
    capacity: usize,
) -> (NotificationProducer, NotificationConsumer) {
    let rb = HeapRb::<Notification>::new(capacity);
    rb.split()
}

/// Drain everything currently queued on a consumer
pub fn drain<C>(consumer: &mut C) -> Vec<C::Item>
where
    C: ringbuf::traits::Consumer,
{
    let mut items = Vec::new();
    while let Some(item) = consumer.try_pop() {
        items.push(item);
    }
    items
}

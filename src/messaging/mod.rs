// Messaging module - Command, update and notification channels between UI and sequencer

pub mod channels;
pub mod command;
pub mod notification;
pub mod update;

pub use channels::{
    CommandConsumer, CommandProducer, NotificationConsumer, NotificationProducer, UpdateConsumer,
    UpdateProducer, create_command_channel, create_notification_channel, create_update_channel,
};
pub use command::Command;
pub use notification::{Notification, NotificationCategory, NotificationLevel};
pub use update::TrackUpdate;

//! Event progress: started by its first round, completed only by the grand finale.

use crate::models::{Event, Status};

/// Move a pending event to `Ongoing`. No-op otherwise.
pub(crate) fn start_event(event: &mut Event) {
    if event.progress == Status::Pending {
        event.progress = Status::Ongoing;
        log::info!("Event {} ({}) started", event.id, event.name);
    }
}

/// Mark the event completed. Only the grand-finale round completion calls this.
pub(crate) fn mark_completed(event: &mut Event) {
    if event.progress != Status::Completed {
        event.progress = Status::Completed;
        log::info!("Event {} ({}) completed", event.id, event.name);
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::Result;
use crate::repositories::{ReadQuery, SegmentCounter};

pub const COUNTING_READS_MESSAGE: &str = "Counting number of unique and mapped reads.";

/// A fire and forget sink for progress messages
pub trait NotificationService {
    fn notify(&self, message: &str);
}

///
/// Keeps every message it receives, and echoes it to stderr unless silent.
///
#[derive(Debug, Default)]
pub struct SimpleNotificationService {
    messages: RefCell<Vec<String>>,
    silent: bool,
}

impl SimpleNotificationService {
    pub fn new(silent: bool) -> Self {
        SimpleNotificationService {
            messages: RefCell::new(Vec::new()),
            silent,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl NotificationService for SimpleNotificationService {
    fn notify(&self, message: &str) {
        if !self.silent {
            eprintln!("{message}");
        }
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Forwards messages to the `log` facade at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationService;

impl NotificationService for LogNotificationService {
    fn notify(&self, message: &str) {
        log::info!("{message}");
    }
}

/// Announces every count before delegating it
pub struct NotifyingSegmentCounter {
    counter: Box<dyn SegmentCounter>,
    notifications: Rc<dyn NotificationService>,
}

impl NotifyingSegmentCounter {
    pub fn new(counter: Box<dyn SegmentCounter>, notifications: Rc<dyn NotificationService>) -> Self {
        NotifyingSegmentCounter {
            counter,
            notifications,
        }
    }
}

impl SegmentCounter for NotifyingSegmentCounter {
    fn count_segments(&self, exclude: Option<&[ReadQuery]>) -> Result<u64> {
        self.notifications.notify(COUNTING_READS_MESSAGE);
        self.counter.count_segments(exclude)
    }
}

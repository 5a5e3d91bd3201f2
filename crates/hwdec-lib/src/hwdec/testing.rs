//! Test doubles for the hardware layer and the diagnostic sink.

use super::context::{CodecContext, HwAccelAttachment};
use super::report::DiagnosticSink;
use super::session::{HardwareLayer, HardwareSession};
use hwdec_types::ImageFormat;
use log::Level;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    lines: Rc<RefCell<Vec<(Level, String)>>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.borrow().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, level: Level, line: &str) {
        self.lines.borrow_mut().push((level, line.to_string()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Create {
        id: u64,
        format: ImageFormat,
        width: u32,
        height: u32,
    },
    Invalidate {
        id: u64,
        attachment_present: bool,
    },
}

/// Hardware layer that records every create and invalidate in order.
#[derive(Debug, Default)]
pub struct RecordingLayer {
    events: Rc<RefCell<Vec<Event>>>,
    next_id: Cell<u64>,
    fail_with: Cell<Option<i32>>,
    failed: Cell<usize>,
}

impl RecordingLayer {
    pub fn failing(status: i32) -> Self {
        let layer = Self::default();
        layer.fail_with(Some(status));
        layer
    }

    pub fn fail_with(&self, status: Option<i32>) {
        self.fail_with.set(status);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn invalidations(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, Event::Invalidate { .. }))
            .count()
    }

    /// Sessions created successfully and not yet invalidated.
    pub fn live_sessions(&self) -> usize {
        let created = self
            .events
            .borrow()
            .iter()
            .filter(|event| matches!(event, Event::Create { .. }))
            .count();
        created - self.failed.get() - self.invalidations()
    }
}

struct RecordingSession {
    id: u64,
    events: Rc<RefCell<Vec<Event>>>,
}

impl HardwareSession for RecordingSession {
    fn invalidate(self: Box<Self>, attachment: Option<&HwAccelAttachment>) {
        self.events.borrow_mut().push(Event::Invalidate {
            id: self.id,
            attachment_present: attachment.is_some(),
        });
    }
}

impl HardwareLayer for RecordingLayer {
    fn create_session(
        &self,
        codec: &mut CodecContext,
        format: ImageFormat,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn HardwareSession>, i32> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.events.borrow_mut().push(Event::Create {
            id,
            format,
            width,
            height,
        });

        if let Some(status) = self.fail_with.get() {
            self.failed.set(self.failed.get() + 1);
            return Err(status);
        }

        if let Some(attachment) = codec.hwaccel_context_mut() {
            attachment.sw_format = Some(format);
            attachment.width = width;
            attachment.height = height;
            attachment.session_serial = id;
        }

        Ok(Box::new(RecordingSession {
            id,
            events: self.events.clone(),
        }))
    }
}

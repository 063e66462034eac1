//! Structured progress events emitted by the codecs.
//!
//! The events mirror the stages of the embed/decode/composite pipelines and are
//! purely informational: no algorithm branches on whether anyone is listening.
//! Callers that want step-by-step narration pass an [`Observer`] to the
//! `*_observed` entry points; everything else goes through [`NullObserver`].

/// One stage of an embed, decode, or composite operation.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// Message text expanded to a bitstream, 8 bits per byte, MSB-first.
    MessageEncoded { chars: usize, bits: usize },
    /// 16-bit terminator appended to the bitstream.
    SentinelAppended { total_bits: usize },
    /// Capacity validated before any sample is written.
    CapacityChecked { required: usize, capacity: usize },
    /// LSBs written into the sample prefix; `changed` counts samples whose
    /// value actually flipped.
    SamplesWritten { written: usize, changed: usize },
    /// Every sample's LSB extracted, index-ascending.
    BitsExtracted { total: usize },
    /// First sentinel occurrence located; `bit_index` is where it starts.
    SentinelFound { bit_index: usize },
    /// No sentinel run anywhere in the stream.
    SentinelMissing,
    /// Bit groups converted back to characters.
    MessageDecoded { chars: usize },
    /// Transparent overlay allocated for text compositing.
    OverlayCreated { width: u32, height: u32 },
    /// Text bounding box measured at the chosen scale.
    TextMeasured { width: u32, height: u32, scale: u32 },
    /// Logo resized to `scale * base_width`, aspect ratio preserved.
    LogoResized { width: u32, height: u32 },
    /// Logo alpha channel multiplied by opacity / 255.
    AlphaScaled { opacity: u8 },
    /// Placement anchor resolved to a top-left coordinate.
    PlacementResolved { x: i64, y: i64 },
    /// Overlay blended into the base buffer.
    Composited { samples: usize },
}

/// Receives [`TraceEvent`]s as an operation progresses.
pub trait Observer {
    fn on_event(&mut self, event: &TraceEvent);
}

/// Observer that discards every event.
pub struct NullObserver;

impl Observer for NullObserver {
    fn on_event(&mut self, _event: &TraceEvent) {}
}

/// Observer that records events in order, mainly for tests and debugging.
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Vec<TraceEvent>,
}

impl Observer for RecordingObserver {
    fn on_event(&mut self, event: &TraceEvent) {
        self.events.push(event.clone());
    }
}

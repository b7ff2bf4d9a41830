//! Field registry: the closed set of per-frame fields a loopback log can carry,
//! plus the metrics derived from them.
//!
//! Raw fields appear as header columns in the log files; derived fields are
//! computed once per dataset and never read from disk.

use crate::error::{PlotError, Result};

/// Argument that reserves a color slot instead of naming a field.
pub const SKIP_KEYWORD: &str = "none";

/// Suffixes tried, in order, when a field argument does not match a
/// canonical name: "render_time" resolves to "render_time_ms" and "send" to
/// "send_time_ms".
const TIME_SUFFIXES: [&str; 2] = ["_ms", "_time_ms"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    // Raw
    Dropped,
    InputTime,
    SendTime,
    RecvTime,
    EncodedFrameSize,
    Psnr,
    Ssim,
    RenderTime,
    // Derived
    SenderTime,
    ReceiverTime,
    EndToEnd,
    RenderedDelta,
}

struct FieldInfo {
    id: FieldId,
    name: &'static str,
    title: &'static str,
}

static FIELDS: [FieldInfo; 12] = [
    FieldInfo {
        id: FieldId::Dropped,
        name: "dropped",
        title: "dropped",
    },
    FieldInfo {
        id: FieldId::InputTime,
        name: "input_time_ms",
        title: "input time",
    },
    FieldInfo {
        id: FieldId::SendTime,
        name: "send_time_ms",
        title: "send time",
    },
    FieldInfo {
        id: FieldId::RecvTime,
        name: "recv_time_ms",
        title: "recv time",
    },
    FieldInfo {
        id: FieldId::EncodedFrameSize,
        name: "encoded_frame_size",
        title: "encoded frame size",
    },
    FieldInfo {
        id: FieldId::Psnr,
        name: "psnr",
        title: "PSNR",
    },
    FieldInfo {
        id: FieldId::Ssim,
        name: "ssim",
        title: "SSIM",
    },
    FieldInfo {
        id: FieldId::RenderTime,
        name: "render_time_ms",
        title: "render time",
    },
    FieldInfo {
        id: FieldId::SenderTime,
        name: "sender_time",
        title: "sender time",
    },
    FieldInfo {
        id: FieldId::ReceiverTime,
        name: "receiver_time",
        title: "receiver time",
    },
    FieldInfo {
        id: FieldId::EndToEnd,
        name: "end_to_end",
        title: "end to end",
    },
    FieldInfo {
        id: FieldId::RenderedDelta,
        name: "rendered_delta",
        title: "rendered delta",
    },
];

impl FieldId {
    /// Timestamps shifted so the first frame's input time is zero.
    pub const TIME_FIELDS: [FieldId; 4] = [
        FieldId::InputTime,
        FieldId::SendTime,
        FieldId::RecvTime,
        FieldId::RenderTime,
    ];

    pub const DERIVED: [FieldId; 4] = [
        FieldId::SenderTime,
        FieldId::ReceiverTime,
        FieldId::EndToEnd,
        FieldId::RenderedDelta,
    ];

    fn info(self) -> &'static FieldInfo {
        // FIELDS is declared in enum order.
        &FIELDS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn title(self) -> &'static str {
        self.info().title
    }

    pub fn is_derived(self) -> bool {
        Self::DERIVED.contains(&self)
    }
}

/// Exact lookup of a canonical field name.
pub fn name_to_id(name: &str) -> Option<FieldId> {
    FIELDS.iter().find(|f| f.name == name).map(|f| f.id)
}

/// Resolve a user-supplied field argument.
///
/// Returns `Ok(None)` for the skip keyword. Otherwise tries the exact name,
/// then the name with each time suffix appended.
pub fn resolve_arg(text: &str) -> Result<Option<FieldId>> {
    if text == SKIP_KEYWORD {
        return Ok(None);
    }
    if let Some(id) = name_to_id(text) {
        return Ok(Some(id));
    }
    TIME_SUFFIXES
        .iter()
        .find_map(|suffix| name_to_id(&format!("{}{}", text, suffix)))
        .map(Some)
        .ok_or_else(|| PlotError::UnrecognizedField(text.to_string()))
}

/// Presentation options attached to a single plotted field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineFlags {
    pub hide_dropped: bool,
    pub right_axis: bool,
}

impl LineFlags {
    pub fn is_empty(&self) -> bool {
        !self.hide_dropped && !self.right_axis
    }
}

/// One requested series: a field with its flags, or a skipped color slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelector {
    pub field: Option<FieldId>,
    pub flags: LineFlags,
}

impl FieldSelector {
    pub fn new(field: FieldId, flags: LineFlags) -> Self {
        Self {
            field: Some(field),
            flags,
        }
    }

    pub fn skip() -> Self {
        Self {
            field: None,
            flags: LineFlags::default(),
        }
    }
}

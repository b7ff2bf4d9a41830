//! Post-processing applied to every freshly parsed dataset.

use crate::dataset::Samples;
use crate::error::{PlotError, Result};
use crate::field::FieldId;
use std::path::Path;

fn require<'a>(path: &Path, samples: &'a Samples, field: FieldId) -> Result<&'a [f64]> {
    samples
        .get(&field)
        .map(Vec::as_slice)
        .ok_or_else(|| PlotError::MissingField {
            path: path.to_path_buf(),
            field: field.name(),
        })
}

/// Shift all timestamps so that the first frame's input time is zero.
pub(crate) fn subtract_first_input_time(path: &Path, samples: &mut Samples) -> Result<()> {
    let offset = require(path, samples, FieldId::InputTime)?
        .first()
        .copied()
        .unwrap_or(0.0);

    for field in FieldId::TIME_FIELDS {
        if let Some(values) = samples.get_mut(&field) {
            for v in values.iter_mut() {
                *v -= offset;
            }
        }
    }
    Ok(())
}

/// Compute sender time, receiver time, end-to-end time and rendered delta.
///
/// Dropped frames still get sender/receiver/end-to-end values computed from
/// whatever the log recorded; they only affect the rendered delta, which stays
/// 0 for them and does not advance the last render time.
pub(crate) fn generate_derived(path: &Path, length: usize, samples: &mut Samples) -> Result<()> {
    let dropped = require(path, samples, FieldId::Dropped)?;
    let input = require(path, samples, FieldId::InputTime)?;
    let send = require(path, samples, FieldId::SendTime)?;
    let recv = require(path, samples, FieldId::RecvTime)?;
    let render = require(path, samples, FieldId::RenderTime)?;

    let mut sender_time = Vec::with_capacity(length);
    let mut receiver_time = Vec::with_capacity(length);
    let mut end_to_end = Vec::with_capacity(length);
    let mut rendered_delta = vec![0.0; length];

    let mut last_render_time = 0.0;
    for k in 0..length {
        sender_time.push(send[k] - input[k]);

        let decoded_time = render[k];
        receiver_time.push(decoded_time - recv[k]);
        end_to_end.push(decoded_time - input[k]);

        if dropped[k] == 0.0 {
            if k > 0 {
                rendered_delta[k] = decoded_time - last_render_time;
            }
            last_render_time = decoded_time;
        }
    }

    samples.insert(FieldId::SenderTime, sender_time);
    samples.insert(FieldId::ReceiverTime, receiver_time);
    samples.insert(FieldId::EndToEnd, end_to_end);
    samples.insert(FieldId::RenderedDelta, rendered_delta);
    Ok(())
}

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::{BufMut, Bytes, BytesMut};

pub const CURRENT_MARKER: &str = "<<<<<<<";
pub const SEPARATOR_MARKER: &str = "=======";
pub const OTHER_MARKER: &str = ">>>>>>>";

/// Outcome for a single file name
///
/// Absence is a state of its own: a file removed on one side and left alone on
/// the other resolves to the removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileResolution {
    /// Keep the current side's state, present or absent
    KeepCurrent,
    /// Take the other side's state, present or absent
    TakeOther,
    /// Both sides diverged from the base and from each other
    Conflict,
}

impl FileResolution {
    pub fn classify(
        base: Option<&ObjectId>,
        current: Option<&ObjectId>,
        other: Option<&ObjectId>,
    ) -> FileResolution {
        if current == other {
            FileResolution::KeepCurrent
        } else if base == current {
            FileResolution::TakeOther
        } else if base == other {
            FileResolution::KeepCurrent
        } else {
            FileResolution::Conflict
        }
    }
}

/// Render the synthetic blob recorded for a conflicting file
///
/// A missing side is rendered as empty content. Each side is terminated with a
/// newline so the markers always start a line.
///
/// ```text
/// <<<<<<< current (master)
/// <current content>
/// =======
/// <other content>
/// >>>>>>> other (feature)
/// ```
pub fn render_conflict(
    current_branch: &BranchName,
    current: Option<&[u8]>,
    other_branch: &BranchName,
    other: Option<&[u8]>,
) -> Bytes {
    let mut blob = BytesMut::new();

    blob.put_slice(format!("{CURRENT_MARKER} current ({current_branch})\n").as_bytes());
    put_side(&mut blob, current.unwrap_or_default());
    blob.put_slice(format!("{SEPARATOR_MARKER}\n").as_bytes());
    put_side(&mut blob, other.unwrap_or_default());
    blob.put_slice(format!("{OTHER_MARKER} other ({other_branch})\n").as_bytes());

    blob.freeze()
}

fn put_side(blob: &mut BytesMut, content: &[u8]) {
    blob.put_slice(content);
    if !content.is_empty() && !content.ends_with(b"\n") {
        blob.put_u8(b'\n');
    }
}

/// A contiguous run of payload characters produced under one encoding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRun<M> {
    /// Mode the run was encoded or decoded in
    pub mode: M,
    /// Number of characters (or bytes) in the run
    pub count: usize,
}

impl<M: PartialEq + Copy> ModeRun<M> {
    pub fn new(mode: M, count: usize) -> Self {
        Self { mode, count }
    }
}

/// Append `count` characters in `mode`, merging with the previous run when the mode repeats.
pub(crate) fn push_run<M: PartialEq + Copy>(runs: &mut Vec<ModeRun<M>>, mode: M, count: usize) {
    if count == 0 {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.mode == mode => last.count += count,
        _ => runs.push(ModeRun::new(mode, count)),
    }
}

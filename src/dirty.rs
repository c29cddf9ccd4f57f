/// Tracks whether the active grid has edits that have not been exported.
///
/// Set by a cell write; cleared by an export, a sheet switch or a fresh
/// load. It only drives the "unsaved changes" indicator and never affects
/// the data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyFlag(bool);

impl DirtyFlag {
    pub fn clean() -> Self {
        DirtyFlag(false)
    }

    pub fn mark(&mut self) {
        self.0 = true;
    }

    pub fn reset(&mut self) {
        self.0 = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions() {
        let mut flag = DirtyFlag::clean();
        assert!(!flag.is_dirty());
        flag.mark();
        flag.mark();
        assert!(flag.is_dirty());
        flag.reset();
        assert!(!flag.is_dirty());
    }
}

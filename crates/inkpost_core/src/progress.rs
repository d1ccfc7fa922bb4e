//! Publish progress bookkeeping. Values are whole percentages for display only.

pub const COVER_DONE: u8 = 10;
pub const MEDIA_DONE: u8 = 90;
pub const PUBLISHED: u8 = 100;
/// Reported as soon as publishing starts so the editor locks immediately.
pub const STARTED: u8 = 1;

/// Step plan for one finalize run: an optional cover followed by media items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressPlan {
    pub has_cover: bool,
    pub media_total: usize,
}

impl ProgressPlan {
    pub fn new(has_cover: bool, images: usize, videos: usize) -> Self {
        Self {
            has_cover,
            media_total: images + videos,
        }
    }

    /// Total network uploads the plan will issue.
    pub fn upload_count(&self) -> usize {
        self.media_total + usize::from(self.has_cover)
    }

    pub fn after_cover(&self) -> u8 {
        COVER_DONE
    }

    /// Progress once `completed` media items (images then videos) are done.
    pub fn after_media(&self, completed: usize) -> u8 {
        if self.media_total == 0 {
            return MEDIA_DONE;
        }
        let completed = completed.min(self.media_total) as u32;
        let span = u32::from(MEDIA_DONE - COVER_DONE);
        let step = span * completed / self.media_total as u32;
        COVER_DONE + step as u8
    }
}

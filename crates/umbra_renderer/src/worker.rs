//! Block-parallel rendering.
//!
//! The image is cut into horizontal blocks of whole rows. Blocks render
//! independently on a rayon pool, each with its own sampler stream, and are
//! copied into the final image under a single lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use rayon::prelude::*;
use umbra_core::Image;

use crate::renderer::{RenderContext, RenderError, RenderResult};
use crate::sampler::Sampler;

/// Default block height in rows.
pub const DEFAULT_BLOCK_SIZE: u32 = 16;

/// Rows `[y0, y1)` of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderBlock {
    pub y0: u32,
    pub y1: u32,
    /// Position in top-to-bottom order; also selects the sampler stream
    pub index: usize,
}

impl RenderBlock {
    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

/// Split `height` rows into consecutive blocks of `block_size` rows. The
/// last block holds whatever remains.
pub fn make_render_blocks(height: u32, block_size: u32) -> Vec<RenderBlock> {
    let block_size = block_size.max(1);
    (0..height)
        .step_by(block_size as usize)
        .enumerate()
        .map(|(index, y0)| RenderBlock {
            y0,
            y1: (y0 + block_size).min(height),
            index,
        })
        .collect()
}

/// Progress callback, called with `(rows_done, height)` after each block.
pub type ProgressFn<'a> = dyn Fn(u32, u32) + Send + Sync + 'a;

/// Drives an integrator over every block of the image.
pub struct Worker<'a> {
    context: &'a RenderContext,
    block_size: u32,
    thread_count: usize,
    cancel: Option<&'a AtomicBool>,
    progress: Option<&'a ProgressFn<'a>>,
}

impl<'a> Worker<'a> {
    pub fn new(context: &'a RenderContext, block_size: u32) -> RenderResult<Self> {
        if block_size == 0 {
            return Err(RenderError::InvalidBlockSize);
        }
        Ok(Self {
            context,
            block_size,
            thread_count: 0,
            cancel: None,
            progress: None,
        })
    }

    /// Worker threads to use; 0 means one per core.
    pub fn with_threads(mut self, thread_count: usize) -> Self {
        self.thread_count = thread_count;
        self
    }

    /// Flag checked before each block starts. Blocks already running finish.
    pub fn with_cancel(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_progress(mut self, progress: &'a ProgressFn<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Render the whole image. Block `k` draws from `sampler.copy(k)`.
    ///
    /// A cancelled render returns [`Image::empty`].
    pub fn run(&self, sampler: &dyn Sampler) -> RenderResult<Image> {
        let camera = self.context.camera();
        let (width, height) = (camera.width(), camera.height());
        let blocks = make_render_blocks(height, self.block_size);
        let integrator = self.context.integrator();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.thread_count)
            .build()?;

        log::debug!(
            "Rendering {} blocks of up to {} rows on {} threads",
            blocks.len(),
            self.block_size,
            pool.current_num_threads()
        );

        // Image plus rows finished so far
        let state = Mutex::new((Image::new(width, height), 0u32));

        pool.install(|| {
            blocks.par_iter().for_each(|block| {
                if self.cancelled() {
                    return;
                }

                let start = Instant::now();
                let mut block_sampler = sampler.copy(block.index as u64);
                let slice = integrator.render_block(self.context, block, block_sampler.as_mut());

                let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
                let (image, rows_done) = &mut *guard;
                image.blit_rows(&slice, block.y0);
                *rows_done += block.height();
                if let Some(progress) = self.progress {
                    progress(*rows_done, height);
                }

                log::debug!(
                    "Block {} (rows {}..{}) done in {:.1?}",
                    block.index,
                    block.y0,
                    block.y1,
                    start.elapsed()
                );
            });
        });

        if self.cancelled() {
            log::info!("Render cancelled");
            return Ok(Image::empty());
        }

        let (image, _) = state.into_inner().unwrap_or_else(PoisonError::into_inner);
        Ok(image)
    }
}

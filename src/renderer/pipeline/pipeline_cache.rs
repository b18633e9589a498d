//! Render Pipeline Cache
//!
//! Central owner of all `wgpu::RenderPipeline` instances, deduplicated by a
//! hashed [`PipelineKey`]. The key embeds the source hashes of both shader
//! stages, so a hot-reloaded program automatically misses the cache and gets
//! a pipeline built against the new module, while consumers keep holding the
//! same registry keys.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Identity of one render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    /// Which pass family the pipeline belongs to.
    pub pass: &'static str,
    /// Source hash of the vertex program.
    pub vertex_hash: u128,
    /// Source hash of the pixel program.
    pub pixel_hash: u128,
    /// Pass-specific state bits (target format, blend mode, …).
    pub aux: u64,
}

/// Hashes a canonical key with the crate-wide fx hasher.
#[must_use]
pub fn fx_hash_key<K: Hash>(key: &K) -> u64 {
    use std::hash::BuildHasher;

    rustc_hash::FxBuildHasher.hash_one(key)
}

/// Pipeline storage and deduplication cache.
#[derive(Default)]
pub struct PipelineCache {
    pipelines: FxHashMap<u64, wgpu::RenderPipeline>,
}

impl PipelineCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pipelines: FxHashMap::default(),
        }
    }

    /// Looks up the pipeline for `key`, building it on first use.
    pub fn get_or_create(
        &mut self,
        key: &PipelineKey,
        build: impl FnOnce() -> wgpu::RenderPipeline,
    ) -> &wgpu::RenderPipeline {
        let hash = fx_hash_key(key);
        self.pipelines.entry(hash).or_insert_with(build)
    }

    /// Number of cached pipelines.
    #[must_use]
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }
}

// prefs.rs — run preferences and worker-count defaults.
//
// `Prefs` is a plain value type owned by the caller and passed by reference
// into every codec. Nothing in it is shared between runs.

use tracing::warn;

use crate::config::{
    BLOCK_SIZE_DEFAULT, BLOCK_SIZE_MAX, NB_WORKERS_DEFAULT, NB_WORKERS_MAX,
    TRANSFORM_WORKERS_DEFAULT,
};

// ---------------------------------------------------------------------------
// Numeric constants
// ---------------------------------------------------------------------------
pub const KB: usize = 1 << 10;
pub const MB: usize = 1 << 20;

// ---------------------------------------------------------------------------
// Worker-count defaults
// ---------------------------------------------------------------------------

/// Returns the number of workers used when none is configured: the
/// available parallelism of the machine, never less than 1.
pub fn default_nb_workers() -> usize {
    num_cpus::get().max(1)
}

/// Read the worker count from the `LZ4PIPE_NBWORKERS` environment variable.
pub fn init_nb_workers() -> usize {
    init_nb_workers_from(std::env::var("LZ4PIPE_NBWORKERS").ok().as_deref())
}

/// Testable core of [`init_nb_workers`]: parse an optional raw value.
///
/// Returns [`NB_WORKERS_DEFAULT`] (`0`, auto) when unset or non-numeric.
pub fn init_nb_workers_from(env_val: Option<&str>) -> usize {
    parse_env_count("LZ4PIPE_NBWORKERS", env_val).unwrap_or(NB_WORKERS_DEFAULT)
}

/// Read the transform-worker count from `LZ4PIPE_TRANSFORM_WORKERS`.
pub fn init_transform_workers() -> usize {
    init_transform_workers_from(std::env::var("LZ4PIPE_TRANSFORM_WORKERS").ok().as_deref())
}

/// Testable core of [`init_transform_workers`].
pub fn init_transform_workers_from(env_val: Option<&str>) -> usize {
    parse_env_count("LZ4PIPE_TRANSFORM_WORKERS", env_val)
        .filter(|&n| n > 0)
        .unwrap_or(TRANSFORM_WORKERS_DEFAULT)
}

fn parse_env_count(name: &str, env_val: Option<&str>) -> Option<usize> {
    let raw = env_val?;
    match raw.trim().parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(variable = name, value = raw, "ignoring environment setting: not a valid unsigned value");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Preferences struct
// ---------------------------------------------------------------------------

/// All tunable parameters for one compression or decompression run.
#[derive(Clone, Debug)]
pub struct Prefs {
    /// Number of pipeline workers. 1 selects the direct-stream codec;
    /// any other value selects the chunked pipeline and sizes both hand-off
    /// queues. Default: available parallelism.
    pub nb_workers: usize,
    /// Number of concurrent transform workers in chunked mode. Default: 1.
    pub transform_workers: usize,
    /// Raw bytes per chunk on compression. Default: 1 MiB.
    pub block_size: usize,
    /// Largest output one chunk may decompress to. Independent of
    /// `block_size`. Default: [`BLOCK_SIZE_MAX`].
    pub chunk_limit: usize,
    /// Copy the source modification time onto the target after success.
    /// Default: true.
    pub preserve_mtime: bool,
}

impl Default for Prefs {
    fn default() -> Self {
        Prefs {
            nb_workers: default_nb_workers(),
            transform_workers: TRANSFORM_WORKERS_DEFAULT,
            block_size: BLOCK_SIZE_DEFAULT,
            chunk_limit: BLOCK_SIZE_MAX,
            preserve_mtime: true,
        }
    }
}

impl Prefs {
    /// Builds preferences from the process environment, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let mut prefs = Self::default();
        let nb = init_nb_workers();
        if nb != 0 {
            prefs.set_nb_workers(nb);
        }
        prefs.set_transform_workers(init_transform_workers());
        prefs
    }

    /// Sets the number of workers, clamped to [1, NB_WORKERS_MAX].
    /// 0 means auto-detect. Returns the actual value stored.
    pub fn set_nb_workers(&mut self, nb_workers: usize) -> usize {
        let nb = if nb_workers == 0 {
            default_nb_workers()
        } else {
            nb_workers
        };
        self.nb_workers = nb.clamp(1, NB_WORKERS_MAX);
        self.nb_workers
    }

    /// Sets the number of transform workers, clamped to [1, NB_WORKERS_MAX].
    pub fn set_transform_workers(&mut self, n: usize) -> usize {
        self.transform_workers = n.clamp(1, NB_WORKERS_MAX);
        self.transform_workers
    }

    /// Sets the compression block size in bytes. Values of 0 are replaced
    /// by the default; values above [`BLOCK_SIZE_MAX`] are clamped to it.
    pub fn set_block_size(&mut self, block_size: usize) -> usize {
        self.block_size = if block_size == 0 {
            BLOCK_SIZE_DEFAULT
        } else {
            block_size.min(BLOCK_SIZE_MAX)
        };
        self.block_size
    }

    /// Sets the per-chunk decompression limit in bytes. Values of 0 restore
    /// [`BLOCK_SIZE_MAX`]; larger values are clamped to it.
    pub fn set_chunk_limit(&mut self, limit: usize) -> usize {
        self.chunk_limit = if limit == 0 {
            BLOCK_SIZE_MAX
        } else {
            limit.min(BLOCK_SIZE_MAX)
        };
        self.chunk_limit
    }

    /// Enables or disables modification-time propagation. Returns the new value.
    pub fn set_preserve_mtime(&mut self, yes: bool) -> bool {
        self.preserve_mtime = yes;
        yes
    }

    /// `true` when this configuration selects the single-threaded
    /// direct-stream codec instead of the chunked pipeline.
    pub fn is_single_threaded(&self) -> bool {
        self.nb_workers <= 1
    }

    /// Capacity shared by both inter-stage queues of a chunked run.
    pub fn queue_capacity(&self) -> usize {
        self.nb_workers.max(1)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

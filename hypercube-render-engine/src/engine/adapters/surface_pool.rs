use crate::error::EngineError;
use constants::render_settings::MAX_LIVE_SURFACES;

/// Opaque handle to one live drawing surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(u32);

impl SurfaceHandle {
    pub fn id(self) -> u32 {
        self.0
    }
}

/// Hands out surfaces under a hard ceiling on how many may be live at once.
#[derive(Debug)]
pub struct SurfacePool {
    capacity: usize,
    live: Vec<SurfaceHandle>,
    next_id: u32,
}

impl Default for SurfacePool {
    fn default() -> Self {
        Self::with_capacity(MAX_LIVE_SURFACES)
    }
}

impl SurfacePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            live: Vec::new(),
            next_id: 1,
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// All or nothing: either `count` fresh handles or an error with nothing acquired.
    pub fn acquire(&mut self, engine: &'static str, count: usize) -> Result<Vec<SurfaceHandle>, EngineError> {
        if self.live.len() + count > self.capacity {
            return Err(EngineError::ResourceUnavailable {
                engine,
                reason: format!(
                    "{} surfaces requested, {} of {} already live",
                    count,
                    self.live.len(),
                    self.capacity
                ),
            });
        }
        let handles: Vec<SurfaceHandle> = (0..count)
            .map(|_| {
                let handle = SurfaceHandle(self.next_id);
                self.next_id += 1;
                handle
            })
            .collect();
        self.live.extend_from_slice(&handles);
        Ok(handles)
    }

    pub fn release(&mut self, handles: &[SurfaceHandle]) {
        self.live.retain(|live| !handles.contains(live));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquisition_beyond_capacity_fails_without_side_effects() {
        let mut pool = SurfacePool::with_capacity(8);
        let first = pool.acquire("A", 5).unwrap();
        assert_eq!(pool.live_count(), 5);
        assert!(pool.acquire("C", 5).is_err());
        assert_eq!(pool.live_count(), 5);

        pool.release(&first);
        assert_eq!(pool.live_count(), 0);
        let second = pool.acquire("C", 5).unwrap();
        assert!(second.iter().all(|h| !first.contains(h)));
    }
}

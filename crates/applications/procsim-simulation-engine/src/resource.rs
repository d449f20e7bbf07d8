//! Shared resources: the CPU slots and the memory pool

use std::collections::VecDeque;

use procsim_core::JobId;

/// Outcome of a CPU request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// A slot was free and is now held by the requester
    Immediate,
    /// All slots are held; the requester waits at this queue position (0 = head)
    Queued(usize),
}

/// A resource with a fixed number of concurrent holders and a FIFO wait queue
#[derive(Debug)]
pub struct Resource {
    capacity: usize,
    holders: Vec<JobId>,
    waiters: VecDeque<JobId>,
}

impl Resource {
    pub fn new(capacity: usize) -> Self {
        Resource {
            capacity,
            holders: Vec::with_capacity(capacity),
            waiters: VecDeque::new(),
        }
    }

    /// Grant a slot to `job` if one is free, otherwise append it to the wait queue
    pub fn request(&mut self, job: JobId) -> Grant {
        debug_assert!(
            !self.holders.contains(&job) && !self.waiters.contains(&job),
            "job {job} requested the resource twice"
        );

        if self.holders.len() < self.capacity {
            self.holders.push(job);
            Grant::Immediate
        } else {
            self.waiters.push_back(job);
            Grant::Queued(self.waiters.len() - 1)
        }
    }

    /// Free the slot held by `job`.
    ///
    /// If anyone is waiting, the slot passes straight to the head of the
    /// queue and that job is returned so the caller can resume it.
    pub fn release(&mut self, job: JobId) -> Option<JobId> {
        let position = self.holders.iter().position(|&holder| holder == job);
        debug_assert!(position.is_some(), "job {job} released a slot it does not hold");
        if let Some(position) = position {
            self.holders.swap_remove(position);
        }

        let next = self.waiters.pop_front()?;
        self.holders.push(next);
        Some(next)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently held
    pub fn held(&self) -> usize {
        self.holders.len()
    }

    pub fn holders(&self) -> &[JobId] {
        &self.holders
    }

    /// Number of jobs waiting for a slot
    pub fn queue_len(&self) -> usize {
        self.waiters.len()
    }
}

/// A counted, capacity-bounded reservoir (the memory pool)
///
/// No job consumes memory yet; the pool is built with the run and can be
/// inspected, but only `try_get` / `try_put` move its level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    level: u64,
    capacity: u64,
}

impl Container {
    /// Create a container holding `init` units out of `capacity`
    pub fn new(init: u64, capacity: u64) -> Self {
        Container {
            level: init.min(capacity),
            capacity,
        }
    }

    /// Create a container that starts full
    pub fn full(capacity: u64) -> Self {
        Self::new(capacity, capacity)
    }

    /// Take `amount` units out. Returns false (and changes nothing) if the
    /// level is too low.
    pub fn try_get(&mut self, amount: u64) -> bool {
        if amount <= self.level {
            self.level -= amount;
            true
        } else {
            false
        }
    }

    /// Put `amount` units back. Returns false (and changes nothing) if that
    /// would overflow the capacity.
    pub fn try_put(&mut self, amount: u64) -> bool {
        if amount <= self.capacity - self.level {
            self.level += amount;
            true
        } else {
            false
        }
    }

    pub fn level(&self) -> u64 {
        self.level
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

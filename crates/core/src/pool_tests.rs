// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn context(owner: &'static str, count: u32) -> DrainContext<&'static str> {
    DrainContext::new(owner, owner, "", count)
}

#[test]
fn new_context_starts_pending() {
    let ctx = context("top", 1);
    assert_eq!(ctx.phase, DrainPhase::Pending);
}

#[test]
fn acquire_and_get() {
    let mut pool = ContextPool::new();
    let key = pool.acquire(context("top.a", 2));

    let ctx = pool.get(key).unwrap();
    assert_eq!(ctx.owner, "top.a");
    assert_eq!(ctx.count, 2);
    assert_eq!(
        pool.stats(),
        PoolStats {
            allocated: 1,
            live: 1,
            free: 0
        }
    );
}

#[test]
fn release_invalidates_key() {
    let mut pool = ContextPool::new();
    let key = pool.acquire(context("top.a", 1));

    let released = pool.release(key).unwrap();
    assert_eq!(released.owner, "top.a");
    assert!(!pool.contains(key));
    assert!(pool.release(key).is_none());
    assert!(pool.get_mut(key).is_none());
}

#[test]
fn released_slot_is_reused_with_new_generation() {
    let mut pool = ContextPool::new();
    let first = pool.acquire(context("top.a", 1));
    pool.release(first);

    let second = pool.acquire(context("top.b", 1));

    assert_ne!(first, second);
    assert!(pool.get(first).is_none());
    assert_eq!(pool.get(second).unwrap().owner, "top.b");
    assert_eq!(
        pool.stats(),
        PoolStats {
            allocated: 1,
            live: 1,
            free: 0
        }
    );
}

#[test]
fn churn_does_not_grow_pool() {
    let mut pool = ContextPool::new();
    for _ in 0..1000 {
        let key = pool.acquire(context("top", 1));
        pool.release(key);
    }
    assert_eq!(pool.stats().allocated, 1);
    assert_eq!(pool.stats().free, 1);
}

#[test]
fn get_mut_updates_phase() {
    let mut pool = ContextPool::new();
    let key = pool.acquire(context("top", 1));

    pool.get_mut(key).unwrap().phase = DrainPhase::Running;

    assert_eq!(pool.get(key).unwrap().phase, DrainPhase::Running);
}

#[test]
fn key_display_names_slot_and_generation() {
    let mut pool = ContextPool::new();
    let key = pool.acquire(context("top", 1));
    pool.release(key);
    let key = pool.acquire(context("top", 1));
    assert_eq!(key.to_string(), "ctx-0.1");
}

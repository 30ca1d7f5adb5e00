#![no_main]

use libfuzzer_sys::fuzz_target;
use murmur_collections::{DynamicQueue, DynamicStack};
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = serde_json::from_slice::<Value>(data) else {
        return;
    };
    let non_null = match &json {
        Value::Array(items) => Some(items.iter().filter(|v| !v.is_null()).count()),
        _ => None,
    };

    let stack = DynamicStack::from_json(json.clone());
    let queue = DynamicQueue::from_json(json);
    assert_eq!(stack.is_ok(), non_null.is_some());
    assert_eq!(queue.is_ok(), non_null.is_some());

    if let (Ok(stack), Ok(queue), Some(count)) = (stack, queue, non_null) {
        assert_eq!(stack.len(), count);
        assert_eq!(queue.len(), count);
        assert!(stack.iter().all(|v| !v.is_null()));
        // Both round-trip through their own native order.
        assert_eq!(DynamicStack::from_json(stack.to_json()).map(|s| s.to_vec()).ok(), Some(stack.to_vec()));
        assert_eq!(DynamicQueue::from_json(queue.to_json()).map(|q| q.to_vec()).ok(), Some(queue.to_vec()));
    }
});

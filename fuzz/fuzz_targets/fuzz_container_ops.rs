#![no_main]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use murmur_collections::{ObservableQueue, ObservableStack};

#[derive(Debug, Arbitrary)]
enum Op {
    Add(Option<u16>),
    Remove,
    Peek,
    Clear,
    CopyTo { len: u8, offset: u8 },
}

#[derive(Debug, Arbitrary)]
struct Input {
    lifo: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let events = Arc::new(Mutex::new(0usize));
    let mut model: VecDeque<u16> = VecDeque::new();

    if input.lifo {
        let mut stack: ObservableStack<u16> = ObservableStack::new();
        let e = Arc::clone(&events);
        stack.on_added().subscribe(move |_| *e.lock().unwrap() += 1);
        let e = Arc::clone(&events);
        stack.on_removed().subscribe(move |_| *e.lock().unwrap() += 1);
        let e = Arc::clone(&events);
        stack.on_cleared().subscribe(move |_| *e.lock().unwrap() += 1);

        let mut expected_events = 0;
        for op in &input.ops {
            match *op {
                Op::Add(item) => {
                    expected_events += 1;
                    assert_eq!(stack.add(item), item.is_some());
                    if let Some(v) = item {
                        model.push_back(v);
                    }
                }
                Op::Remove => {
                    expected_events += 1;
                    assert_eq!(stack.remove(), model.pop_back());
                }
                Op::Peek => assert_eq!(stack.peek().ok(), model.back()),
                Op::Clear => {
                    expected_events += 1;
                    stack.clear();
                    model.clear();
                }
                Op::CopyTo { len, offset } => {
                    let mut buf = vec![0u16; usize::from(len)];
                    let fits = usize::from(offset) + model.len() <= buf.len();
                    assert_eq!(stack.copy_to(&mut buf, usize::from(offset)).is_ok(), fits);
                }
            }
            assert_eq!(stack.len(), model.len());
        }
        assert_eq!(*events.lock().unwrap(), expected_events);
    } else {
        let mut queue: ObservableQueue<u16> = ObservableQueue::new();
        for op in &input.ops {
            match *op {
                Op::Add(item) => {
                    assert_eq!(queue.add(item), item.is_some());
                    if let Some(v) = item {
                        model.push_back(v);
                    }
                }
                Op::Remove => assert_eq!(queue.remove(), model.pop_front()),
                Op::Peek => assert_eq!(queue.peek().ok(), model.front()),
                Op::Clear => {
                    queue.clear();
                    model.clear();
                }
                Op::CopyTo { len, offset } => {
                    let mut buf = vec![0u16; usize::from(len)];
                    let fits = usize::from(offset) + model.len() <= buf.len();
                    assert_eq!(queue.copy_to(&mut buf, usize::from(offset)).is_ok(), fits);
                }
            }
            assert_eq!(queue.to_vec(), model.iter().copied().collect::<Vec<_>>());
        }
    }
});

#![no_main]

use std::sync::{Arc, Mutex};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use murmur_io::{BufferedSink, PumpState, SinkPump};

#[derive(Debug, Arbitrary)]
struct Step {
    fragment: Option<String>,
    /// Extra fragments the consumer appends while handling this one.
    echoes: u8,
    fail: bool,
}

fuzz_target!(|steps: Vec<Step>| {
    let sink = BufferedSink::new();
    let out = Arc::new(Mutex::new(Vec::new()));
    let inner = sink.clone();
    let o = Arc::clone(&out);
    let pump = SinkPump::new(&sink, move |s: String| {
        if let Some(rest) = s.strip_prefix("fail:") {
            return Err(rest.to_owned().into());
        }
        if let Some((_, n)) = s.rsplit_once("#echo") {
            let n: u8 = n.parse().unwrap_or(0);
            for i in 0..n.min(4) {
                inner.append(format!("e{i}"))?;
            }
        }
        o.lock().unwrap().push(s);
        Ok(())
    });

    for step in steps {
        let fragment = step.fragment.map(|f| {
            if step.fail {
                format!("fail:{f}")
            } else {
                format!("{f}#echo{}", step.echoes)
            }
        });
        let _ = sink.append_opt(fragment);
        assert_eq!(pump.state(), PumpState::Idle);
    }
    let _ = pump.drain_now();
    assert_eq!(pump.state(), PumpState::Idle);
    assert_eq!(pump.forwarded(), out.lock().unwrap().len() as u64);
});

use core::sync::atomic::AtomicBool;
use std::io;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

static TIMEOUT: AtomicBool = AtomicBool::new(false);

/// Spawns a watcher thread that raises the timeout flag once `budget` has elapsed.
pub fn initialize_timeout(budget: Duration) -> io::Result<()> {
    let start_time = Instant::now();
    thread::Builder::new()
        .name("timeout".into())
        .spawn(move || {
            while start_time.elapsed() < budget {
                thread::sleep(Duration::from_millis(10));
            }
            TIMEOUT.store(true, Ordering::SeqCst);
        })
        .map(|_| ())
}

pub fn timeout() -> bool {
    TIMEOUT.load(Ordering::SeqCst)
}

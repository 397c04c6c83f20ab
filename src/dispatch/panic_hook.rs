//! Keeps the default panic report out of stderr while a callback runs.
//!
//! A callback panic is reported once, as a `COMMAND_PANICKED` diagnostic.
//! The hook installed by [`install`] stays silent for the thread that is
//! inside [`silenced`] and defers to the previous hook everywhere else.

use std::cell::Cell;
use std::panic;
use std::sync::Once;

thread_local! {
    static SILENCED: Cell<bool> = const { Cell::new(false) };
}

static INSTALL: Once = Once::new();

/// Install the filtering hook. Later calls do nothing.
pub fn install() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !is_silenced() {
                previous(info);
            }
        }));
    });
}

/// Whether panics on this thread are currently kept quiet.
pub fn is_silenced() -> bool {
    SILENCED.with(Cell::get)
}

/// Run `f` with panic reports on this thread kept quiet.
pub(super) fn silenced<R>(f: impl FnOnce() -> R) -> R {
    struct Reset(bool);

    impl Drop for Reset {
        fn drop(&mut self) {
            SILENCED.with(|flag| flag.set(self.0));
        }
    }

    let _reset = Reset(SILENCED.with(|flag| flag.replace(true)));
    f()
}

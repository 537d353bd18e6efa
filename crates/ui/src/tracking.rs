use std::cell::RefCell;
use std::rc::Rc;

use dioxus::core::{Task, spawn_forever};
use dioxus::prelude::*;
use matelog_core::Clock;
use matelog_core::model::{ActivityContext, ActivityId, ScreenKind};
use services::TrackedScreen;

use crate::context::AppContext;

/// Handle returned by [`use_screen_tracking`].
#[derive(Clone)]
pub struct ScreenTracking {
    activity: Signal<Option<ActivityId>>,
    screen: Rc<RefCell<Option<TrackedScreen>>>,
    clock: Clock,
}

impl ScreenTracking {
    /// The backend id of the open activity, once the open call has answered.
    #[must_use]
    pub fn activity_id(&self) -> Option<ActivityId> {
        *self.activity.read()
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.screen
            .borrow()
            .as_ref()
            .map_or(0, |screen| screen.elapsed_seconds(self.clock.now()))
    }
}

/// Opens a screen-time activity on mount and closes it on unmount.
///
/// A change of `kind` or `context` closes the current activity at once and opens
/// a new one. Closes outlive the component; an open still in flight is cancelled
/// instead, so nothing is closed for it.
pub fn use_screen_tracking(kind: ScreenKind, context: ActivityContext) -> ScreenTracking {
    let tracker = use_context::<AppContext>().tracker();
    let mut activity = use_signal(|| None::<ActivityId>);
    let screen = use_hook(|| Rc::new(RefCell::new(None::<TrackedScreen>)));
    let mut pending = use_signal(|| None::<Task>);

    {
        let tracker = tracker.clone();
        let screen = Rc::clone(&screen);
        use_effect(use_reactive!(|(kind, context)| {
            if let Some(task) = pending.write().take() {
                task.cancel();
            }
            activity.set(None);
            if let Some(previous) = screen.borrow_mut().take() {
                let tracker = tracker.clone();
                spawn_forever(async move {
                    tracker.close(&previous).await;
                });
            }

            let tracker = tracker.clone();
            let screen = Rc::clone(&screen);
            let task = spawn(async move {
                let opened = tracker.open(kind, context).await;
                activity.set(opened.activity_id);
                *screen.borrow_mut() = Some(opened);
                pending.set(None);
            });
            pending.set(Some(task));
        }));
    }

    {
        let screen = Rc::clone(&screen);
        let tracker = tracker.clone();
        use_drop(move || {
            let Some(opened) = screen.borrow_mut().take() else {
                return;
            };
            let tracker = tracker.clone();
            spawn_forever(async move {
                tracker.close(&opened).await;
            });
        });
    }

    ScreenTracking {
        activity,
        screen,
        clock: tracker.clock(),
    }
}

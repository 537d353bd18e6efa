use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use api::memory::{DEMO_PASSWORD, DEMO_USERNAME};
use api::{Backend, InMemoryBackend, LessonGateway};
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use matelog_core::flow::TopicFlow;
use matelog_core::model::{ActivityContext, Credentials, ScreenKind, TopicContent, TopicId};
use matelog_core::time::fixed_clock;
use services::AppServices;

use crate::context::{
    AppContext, MarkupPolicy, SessionHandle, SessionStatus, build_app_context,
};
use crate::tracking::use_screen_tracking;
use crate::views::topic::{ExercisePane, TopicScreenState, use_topic_screen_state};
use crate::views::{AuthView, LessonDetailView, LessonsView, TopicView};
use crate::vm::FinalizeDialog;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ViewKind {
    Auth,
    Lessons,
    LessonDetail(u64),
    Topic(u64),
    /// A bare tracked screen, driven through [`ViewHarness::set_screen`].
    Tracked(ScreenKind),
    /// Only the per-topic signals, driven through [`ViewHarness::set_topic`].
    TopicState(u64),
    /// The exercise pane over a flow prepared by [`setup_exercise_harness`].
    Exercises,
}

#[derive(Clone, Default)]
pub struct HarnessHandles {
    mounted: Rc<RefCell<Option<Signal<Option<ViewKind>>>>>,
    screen: Rc<RefCell<Option<Signal<ScreenKind>>>>,
    topic: Rc<RefCell<Option<Signal<u64>>>>,
    topic_state: Rc<RefCell<Option<TopicScreenState>>>,
    exercise_flow: Rc<RefCell<Option<TopicFlow>>>,
}

impl HarnessHandles {
    fn mounted(&self) -> Signal<Option<ViewKind>> {
        self.mounted.borrow().expect("view registered")
    }

    fn screen(&self) -> Signal<ScreenKind> {
        self.screen.borrow().expect("tracked screen registered")
    }

    fn topic(&self) -> Signal<u64> {
        self.topic.borrow().expect("topic id registered")
    }

    pub fn topic_state(&self) -> TopicScreenState {
        self.topic_state.borrow().expect("topic state registered")
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    context: AppContext,
    view: ViewKind,
    status: SessionStatus,
    handles: HarnessHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    use_context_provider(|| props.context.clone());
    use_context_provider(|| props.view);
    use_context_provider(|| props.handles.clone());
    use_context_provider(|| SessionHandle::new(props.status.clone()));
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let initial = use_context::<ViewKind>();
    let handles = use_context::<HarnessHandles>();
    let mounted = use_signal(|| Some(initial));
    let mut registered = use_signal(|| false);
    if !registered() {
        registered.set(true);
        *handles.mounted.borrow_mut() = Some(mounted);
    }

    match mounted() {
        None => rsx! { p { class: "unmounted" } },
        Some(ViewKind::Auth) => rsx! { AuthView {} },
        Some(ViewKind::Lessons) => rsx! { LessonsView {} },
        Some(ViewKind::LessonDetail(id)) => rsx! { LessonDetailView { id } },
        Some(ViewKind::Topic(id)) => rsx! { TopicView { id } },
        Some(ViewKind::Tracked(kind)) => rsx! { TrackedPane { initial: kind } },
        Some(ViewKind::TopicState(id)) => rsx! { TopicStatePane { initial: id } },
        Some(ViewKind::Exercises) => rsx! { ExercisesOnly {} },
    }
}

#[component]
fn TrackedPane(initial: ScreenKind) -> Element {
    let handles = use_context::<HarnessHandles>();
    let kind = use_signal(|| initial);
    let mut registered = use_signal(|| false);
    if !registered() {
        registered.set(true);
        *handles.screen.borrow_mut() = Some(kind);
    }
    let _tracking = use_screen_tracking(kind(), ActivityContext::none());
    rsx! { p { class: "tracked" } }
}

#[component]
fn TopicStatePane(initial: u64) -> Element {
    let handles = use_context::<HarnessHandles>();
    let id = use_signal(|| initial);
    let state = use_topic_screen_state(id());
    let mut registered = use_signal(|| false);
    if !registered() {
        registered.set(true);
        *handles.topic.borrow_mut() = Some(id);
        *handles.topic_state.borrow_mut() = Some(state);
    }
    let notice = state.notice.read().clone().unwrap_or_default();
    rsx! { p { class: "notice", "{notice}" } }
}

#[component]
fn ExercisesOnly() -> Element {
    let handles = use_context::<HarnessHandles>();
    let flow = use_signal(|| handles.exercise_flow.borrow_mut().take());
    let busy = use_signal(|| false);
    let notice = use_signal(|| None::<String>);
    let dialog = use_signal(|| None::<FinalizeDialog>);
    rsx! { ExercisePane { flow, busy, notice, dialog } }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: InMemoryBackend,
    pub handles: HarnessHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub fn drive(&mut self) {
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(Duration::from_millis(50), self.dom.wait_for_work()).await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Loads resolve in one pass and effects fire in the next.
    pub async fn settle(&mut self) {
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    /// Runs `f` inside the dom's runtime, where signal writes reach subscribers.
    pub fn in_runtime<O>(&self, f: impl FnOnce() -> O) -> O {
        self.dom.in_runtime(f)
    }

    /// Swaps the mounted view; `None` unmounts it.
    pub fn show(&mut self, view: Option<ViewKind>) {
        let mut mounted = self.handles.mounted();
        self.in_runtime(|| mounted.set(view));
    }

    pub fn set_screen(&mut self, kind: ScreenKind) {
        let mut screen = self.handles.screen();
        self.in_runtime(|| screen.set(kind));
    }

    pub fn set_topic(&mut self, id: u64) {
        let mut topic = self.handles.topic();
        self.in_runtime(|| topic.set(id));
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// A harness over the demo backend with the demo student signed in.
pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_with_backend(view, InMemoryBackend::demo(), true).await
}

pub async fn setup_signed_out_harness(view: ViewKind) -> ViewHarness {
    setup_with_backend(view, InMemoryBackend::demo(), false).await
}

pub async fn setup_with_backend(
    view: ViewKind,
    backend: InMemoryBackend,
    signed_in: bool,
) -> ViewHarness {
    let services = services_over(&backend);
    let status = sign_in(&services, signed_in).await;
    backend.clear_calls();
    mount(view, backend, services, status, HarnessHandles::default())
}

/// Mounts the exercise pane over demo topic `topic`, after `edit` has reshaped
/// the fetched content and the flow has taken the shortcut to the exercises.
pub async fn setup_exercise_harness(
    topic: u64,
    edit: impl FnOnce(&mut TopicContent),
) -> ViewHarness {
    let backend = InMemoryBackend::demo();
    let services = services_over(&backend);
    let status = sign_in(&services, true).await;

    let mut content = backend
        .topic_content(TopicId::new(topic))
        .await
        .expect("demo topic");
    edit(&mut content);
    let mut flow = TopicFlow::new(content, fixed_clock());
    let _ = flow.go_to_exercises();

    let handles = HarnessHandles::default();
    *handles.exercise_flow.borrow_mut() = Some(flow);
    backend.clear_calls();
    mount(ViewKind::Exercises, backend, services, status, handles)
}

fn services_over(backend: &InMemoryBackend) -> AppServices {
    AppServices::new(
        Backend::from_shared(Arc::new(backend.clone())),
        fixed_clock(),
    )
}

async fn sign_in(services: &AppServices, signed_in: bool) -> SessionStatus {
    if !signed_in {
        return SessionStatus::SignedOut;
    }
    let user = services
        .session()
        .login(&Credentials {
            username: DEMO_USERNAME.into(),
            password: DEMO_PASSWORD.into(),
        })
        .await
        .expect("demo login");
    SessionStatus::SignedIn(user)
}

fn mount(
    view: ViewKind,
    backend: InMemoryBackend,
    services: AppServices,
    status: SessionStatus,
    handles: HarnessHandles,
) -> ViewHarness {
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            context: build_app_context(services, MarkupPolicy::Trusted),
            view,
            status,
            handles: handles.clone(),
        },
    );
    ViewHarness {
        dom,
        backend,
        handles,
    }
}

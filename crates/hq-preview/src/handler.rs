//! One hover lifecycle: classify, resolve, render, attach, detach.
//!
//! ```text
//! Idle --attach--> Resolving --(absent | error)--> Empty
//!                      |
//!                      +--(entity)--> Rendering --> Attached
//!
//! Idle | Resolving | Attached --detach--> Detached
//! ```
//!
//! Resolution runs as a task on the page's [`LocalSpawner`]. When it settles the
//! handler re-checks its state, so a `detach` that lands while the fetch is in
//! flight suppresses tree construction and insertion entirely. The request
//! itself is not cancelled.

use crate::config::ReferenceAttributes;
use crate::reference::Reference;
use crate::reference::ReferenceDescriptor;
use crate::reference::classify;
use crate::render::Resolved;
use crate::resolve::EntityResolver;
use futures::executor::LocalSpawner;
use futures::task::LocalSpawnExt;
use hq_core::PreviewResult;
use hq_dom::Document;
use hq_dom::NodeId;
use hq_model::Clock;
use hq_model::SystemClock;
use hq_net::FetchError;
use hq_net::FetchResult;
use hq_vdom::DomMaterializer;
use hq_vdom::Materializer;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Collaborators shared by every handler on a page.
pub struct PreviewEnv {
    document: Rc<RefCell<Document>>,
    resolver: Rc<dyn EntityResolver>,
    materializer: Rc<dyn Materializer>,
    clock: Rc<dyn Clock>,
    attributes: ReferenceAttributes,
    spawner: LocalSpawner,
}

impl fmt::Debug for PreviewEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewEnv")
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

impl PreviewEnv {
    pub fn new(
        document: Rc<RefCell<Document>>,
        resolver: Rc<dyn EntityResolver>,
        spawner: LocalSpawner,
    ) -> Self {
        Self {
            document,
            resolver,
            materializer: Rc::new(DomMaterializer),
            clock: Rc::new(SystemClock),
            attributes: ReferenceAttributes::default(),
            spawner,
        }
    }

    pub fn with_materializer(mut self, materializer: Rc<dyn Materializer>) -> Self {
        self.materializer = materializer;
        self
    }

    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_attributes(mut self, attributes: ReferenceAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn document(&self) -> &Rc<RefCell<Document>> {
        &self.document
    }

    pub fn attributes(&self) -> &ReferenceAttributes {
        &self.attributes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    Idle,
    Resolving,
    /// Nothing to show: invalid reference, absent entity, or fetch failure.
    Empty,
    Rendering,
    Attached,
    Detached,
}

impl HandlerState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Empty => "empty",
            Self::Rendering => "rendering",
            Self::Attached => "attached",
            Self::Detached => "detached",
        }
    }
}

#[derive(Debug)]
struct HandlerInner {
    target: NodeId,
    state: HandlerState,
    reference: Option<Reference>,
    live: Option<NodeId>,
    last_error: Option<FetchError>,
}

/// Handle to one preview lifecycle. Clones share the same lifecycle.
#[derive(Clone)]
pub struct PreviewHandler {
    env: Rc<PreviewEnv>,
    inner: Rc<RefCell<HandlerInner>>,
}

impl fmt::Debug for PreviewHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandler")
            .field("inner", &self.inner.borrow())
            .finish_non_exhaustive()
    }
}

impl PreviewHandler {
    pub fn new(env: Rc<PreviewEnv>, target: NodeId) -> Self {
        Self {
            env,
            inner: Rc::new(RefCell::new(HandlerInner {
                target,
                state: HandlerState::Idle,
                reference: None,
                live: None,
                last_error: None,
            })),
        }
    }

    pub fn target(&self) -> NodeId {
        self.inner.borrow().target
    }

    pub fn state(&self) -> HandlerState {
        self.inner.borrow().state
    }

    pub fn reference(&self) -> Option<Reference> {
        self.inner.borrow().reference.clone()
    }

    /// The attached preview node, while one exists.
    pub fn live_node(&self) -> Option<NodeId> {
        self.inner.borrow().live
    }

    /// The fetch failure that ended this lifecycle, if any.
    pub fn last_error(&self) -> Option<FetchError> {
        self.inner.borrow().last_error.clone()
    }

    /// Starts the lifecycle. Only an idle handler reacts.
    ///
    /// An unclassifiable reference settles to [`HandlerState::Empty`] before
    /// this returns, without touching the resolver.
    pub fn attach(&self) {
        let target = {
            let inner = self.inner.borrow();
            if inner.state != HandlerState::Idle {
                tracing::debug!(
                    element = inner.target,
                    state = inner.state.as_str(),
                    "attach ignored"
                );
                return;
            }
            inner.target
        };

        let descriptor = {
            let document = self.env.document.borrow();
            ReferenceDescriptor::from_element(&document, target, &self.env.attributes)
        };

        let Some(reference) = classify(&descriptor) else {
            tracing::debug!(element = target, ?descriptor, "reference does not classify");
            self.transition(HandlerState::Empty);
            return;
        };

        tracing::debug!(element = target, kind = reference.kind(), "resolving preview");
        {
            let mut inner = self.inner.borrow_mut();
            inner.reference = Some(reference.clone());
            inner.state = HandlerState::Resolving;
        }

        let task = self.clone().resolve(reference);
        if let Err(error) = self.env.spawner.spawn_local(task) {
            tracing::warn!(element = target, %error, "failed to schedule preview resolution");
            self.transition(HandlerState::Empty);
        }
    }

    /// Ends the lifecycle, removing the preview node if one was attached.
    ///
    /// Safe to call in any state; an empty or already detached handler is left as is.
    pub fn detach(&self) {
        let mut inner = self.inner.borrow_mut();
        match inner.state {
            HandlerState::Empty | HandlerState::Detached => return,
            HandlerState::Idle | HandlerState::Resolving | HandlerState::Rendering => {}
            HandlerState::Attached => {
                if let Some(node) = inner.live.take() {
                    let mut document = self.env.document.borrow_mut();
                    if let Err(error) = self.env.materializer.detach_live(&mut document, node) {
                        tracing::warn!(element = inner.target, node, %error, "failed to detach preview");
                    }
                }
            }
        }
        tracing::debug!(
            element = inner.target,
            from = inner.state.as_str(),
            "preview detached"
        );
        inner.state = HandlerState::Detached;
    }

    async fn resolve(self, reference: Reference) {
        let resolver = Rc::clone(&self.env.resolver);
        let outcome = fetch(resolver.as_ref(), &reference).await;
        self.settle(&reference, outcome);
    }

    fn settle(&self, reference: &Reference, outcome: FetchResult<Option<Resolved>>) {
        let mut inner = self.inner.borrow_mut();
        if let Err(error) = &outcome {
            tracing::warn!(element = inner.target, kind = reference.kind(), %error, "preview fetch failed");
            inner.last_error = Some(error.clone());
        }

        if inner.state != HandlerState::Resolving {
            tracing::debug!(
                element = inner.target,
                state = inner.state.as_str(),
                "resolution settled after detach, skipping insertion"
            );
            return;
        }

        let resolved = match outcome {
            Ok(Some(resolved)) => resolved,
            Ok(None) | Err(_) => {
                tracing::debug!(element = inner.target, kind = reference.kind(), "nothing to preview");
                inner.state = HandlerState::Empty;
                return;
            }
        };

        inner.state = HandlerState::Rendering;
        let tree = resolved.render(self.env.clock.now());
        match self.mount(&tree) {
            Ok(node) => {
                tracing::debug!(element = inner.target, node, kind = reference.kind(), "preview attached");
                inner.live = Some(node);
                inner.state = HandlerState::Attached;
            }
            Err(error) => {
                tracing::warn!(element = inner.target, %error, "failed to attach preview");
                inner.state = HandlerState::Empty;
            }
        }
    }

    fn mount(&self, tree: &hq_vdom::VNode) -> PreviewResult<NodeId> {
        let mut document = self.env.document.borrow_mut();
        let node = self.env.materializer.materialize(&mut document, tree)?;
        self.env.materializer.insert(&mut document, node)?;
        Ok(node)
    }

    fn transition(&self, state: HandlerState) {
        self.inner.borrow_mut().state = state;
    }

    /// True once nothing further can happen to this handler on its own.
    pub(crate) fn is_settled_without_preview(&self) -> bool {
        matches!(self.state(), HandlerState::Empty | HandlerState::Detached)
    }
}

async fn fetch(
    resolver: &dyn EntityResolver,
    reference: &Reference,
) -> FetchResult<Option<Resolved>> {
    match reference {
        Reference::Board { slug } => Ok(resolver.resolve_board(slug).await?.map(Resolved::Board)),
        Reference::Topic { id } => Ok(resolver.resolve_topic(*id).await?.map(Resolved::Topic)),
        Reference::Posts { topic_id, query } => {
            let posts = resolver.resolve_posts(*topic_id, Some(query)).await?;
            Ok((!posts.is_empty()).then_some(Resolved::Posts(posts)))
        }
    }
}

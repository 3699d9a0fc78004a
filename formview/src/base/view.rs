use super::dom::Dom;
use super::emitter::{Event, ListenerId};
use super::query::Query;

/// Element binding and event plumbing shared by view components.
pub trait View {
    type Dom: Dom;
    type Event: Event;

    fn dom(&self) -> &Self::Dom;

    /// Root element the view's template was rendered into.
    fn el(&self) -> <Self::Dom as Dom>::Node;

    fn emit(&self, event: Self::Event);

    fn on<F>(&self, kind: <Self::Event as Event>::Kind, handler: F) -> ListenerId
    where
        F: Fn(&Self::Event) + 'static;

    fn off(&self, id: ListenerId) -> bool;

    fn find(&self, query: &Query) -> Vec<<Self::Dom as Dom>::Node> {
        self.dom().query_all(&self.el(), query)
    }

    fn find_first(&self, query: &Query) -> Option<<Self::Dom as Dom>::Node> {
        self.dom().query_first(&self.el(), query)
    }
}

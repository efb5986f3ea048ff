//! Cart change notification.
//!
//! After every mutation the manager hands the new cart to [`CartNotifier`],
//! which re-renders every badge and publishes a [`CartChanged`] event to all
//! subscribers before the mutating call returns. Successful adds also
//! publish a [`CartNotice`] acknowledgment on a separate channel.

use std::fmt;

use rust_decimal::Decimal;

use super::model::Cart;

/// What a badge should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    /// Cart is empty; the indicator is not shown.
    Hidden,
    /// Total item count.
    Visible(u64),
}

impl Badge {
    #[must_use]
    pub const fn for_count(count: u64) -> Self {
        if count == 0 {
            Self::Hidden
        } else {
            Self::Visible(count)
        }
    }
}

/// A UI indicator that shows the cart's item count.
pub trait BadgeSink {
    fn render(&mut self, badge: Badge);
}

impl<F: FnMut(Badge)> BadgeSink for F {
    fn render(&mut self, badge: Badge) {
        self(badge);
    }
}

/// Snapshot broadcast after every cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartChanged {
    pub cart: Cart,
    /// Sum of quantities.
    pub count: u64,
    /// Subtotal plus shipping.
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient acknowledgment for the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartNotice {
    pub kind: NoticeKind,
    pub message: String,
}

impl CartNotice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Handle returned by [`EventChannel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

/// A synchronous publish/subscribe channel.
///
/// Listeners run in subscription order on the publishing thread.
pub struct EventChannel<E> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<E>)>,
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E> EventChannel<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn publish(&mut self, event: &E) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Badges plus the change and notice channels.
#[derive(Default)]
pub struct CartNotifier {
    badges: Vec<Box<dyn BadgeSink>>,
    changes: EventChannel<CartChanged>,
    notices: EventChannel<CartNotice>,
}

impl fmt::Debug for CartNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartNotifier")
            .field("badges", &self.badges.len())
            .field("changes", &self.changes)
            .field("notices", &self.notices)
            .finish()
    }
}

impl CartNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a badge. It is rendered on the next mutation or refresh.
    pub fn add_badge(&mut self, badge: impl BadgeSink + 'static) {
        self.badges.push(Box::new(badge));
    }

    pub fn on_change(&mut self, listener: impl FnMut(&CartChanged) + 'static) -> SubscriptionId {
        self.changes.subscribe(listener)
    }

    pub fn on_notice(&mut self, listener: impl FnMut(&CartNotice) + 'static) -> SubscriptionId {
        self.notices.subscribe(listener)
    }

    pub fn unsubscribe_change(&mut self, id: SubscriptionId) -> bool {
        self.changes.unsubscribe(id)
    }

    pub fn unsubscribe_notice(&mut self, id: SubscriptionId) -> bool {
        self.notices.unsubscribe(id)
    }

    /// Render every badge for `count`.
    pub fn render_badges(&mut self, count: u64) {
        let badge = Badge::for_count(count);
        for sink in &mut self.badges {
            sink.render(badge);
        }
    }

    /// Render badges and broadcast the new cart.
    pub fn cart_changed(&mut self, cart: &Cart, total: Decimal) {
        let count = cart.item_count();
        self.render_badges(count);
        self.changes.publish(&CartChanged {
            cart: cart.clone(),
            count,
            total,
        });
    }

    pub fn notify(&mut self, notice: &CartNotice) {
        self.notices.publish(notice);
    }
}

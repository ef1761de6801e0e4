use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`Observable::connect`], used to disconnect later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<T> = Box<dyn FnMut(&T)>;

struct Inner<T> {
    value: RefCell<T>,
    observers: RefCell<Vec<(SubscriptionId, Observer<T>)>>,
    live: RefCell<Vec<SubscriptionId>>,
    next_id: Cell<u64>,
    emitting: Cell<bool>,
    pending: Cell<bool>,
}

/// A value holder that pushes every write to its observers.
///
/// Cloning an `Observable` yields another handle to the same value, which is
/// how controls and the window share an option. Observers run synchronously,
/// in subscription order, on every write, including writes of an equal value.
///
/// # Reentrancy
///
/// Observers may connect, disconnect or write the same option while being
/// notified. A write made during notification is delivered after the current
/// round completes, so every observer ends up seeing the final value.
/// Observers connected during a round are first called on the next one.
pub struct Observable<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.inner.value.borrow())
            .field("subscribers", &self.inner.live.borrow().len())
            .finish()
    }
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                observers: RefCell::new(Vec::new()),
                live: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                emitting: Cell::new(false),
                pending: Cell::new(false),
            }),
        }
    }

    /// Creates an option with one observer already connected.
    pub fn with_observer(value: T, observer: impl FnMut(&T) + 'static) -> Self {
        let option = Self::new(value);
        option.connect(observer);
        option
    }

    pub fn value(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub fn set_value(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.emit();
    }

    /// Mutator wired to control change events.
    pub fn change(&self, value: T) {
        self.set_value(value);
    }

    pub fn connect(&self, observer: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner.live.borrow_mut().push(id);
        self.inner
            .observers
            .borrow_mut()
            .push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if `id` was not connected.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut live = self.inner.live.borrow_mut();
        let Some(pos) = live.iter().position(|live_id| *live_id == id) else {
            return false;
        };
        live.remove(pos);
        // While emitting, the observer list is detached and gets pruned
        // against `live` once the round completes.
        if let Ok(mut observers) = self.inner.observers.try_borrow_mut() {
            observers.retain(|(observer_id, _)| *observer_id != id);
        }
        true
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.live.borrow().len()
    }

    /// Notifies every observer with the current value.
    pub fn emit(&self) {
        if self.inner.emitting.get() {
            self.inner.pending.set(true);
            return;
        }
        self.inner.emitting.set(true);
        loop {
            let value = self.value();
            let mut active = std::mem::take(&mut *self.inner.observers.borrow_mut());
            for (id, observer) in active.iter_mut() {
                if self.inner.live.borrow().contains(id) {
                    observer(&value);
                }
            }
            let mut observers = self.inner.observers.borrow_mut();
            let added = std::mem::take(&mut *observers);
            active.extend(added);
            let live = self.inner.live.borrow();
            active.retain(|(id, _)| live.contains(id));
            *observers = active;
            drop(observers);
            drop(live);
            if !self.inner.pending.replace(false) {
                break;
            }
        }
        self.inner.emitting.set(false);
    }
}

/// An option whose value kind is only known at runtime.
///
/// The widget builder dispatches on this to pick a concrete control, and
/// rejects kinds a control cannot represent.
#[derive(Debug, Clone)]
pub enum AnyOption {
    Int(Observable<i64>),
    Real(Observable<f64>),
    Text(Observable<String>),
}

impl AnyOption {
    pub fn kind(&self) -> &'static str {
        match self {
            AnyOption::Int(_) => "int",
            AnyOption::Real(_) => "float",
            AnyOption::Text(_) => "str",
        }
    }
}

impl From<Observable<i64>> for AnyOption {
    fn from(option: Observable<i64>) -> Self {
        AnyOption::Int(option)
    }
}

impl From<Observable<f64>> for AnyOption {
    fn from(option: Observable<f64>) -> Self {
        AnyOption::Real(option)
    }
}

impl From<Observable<String>> for AnyOption {
    fn from(option: Observable<String>) -> Self {
        AnyOption::Text(option)
    }
}

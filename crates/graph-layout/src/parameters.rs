//! Algorithm configuration values and change notification
//!
//! Parameters are plain structs: cloning one gives an independent snapshot
//! that can configure another run. Live reconfiguration goes through
//! [`Observed`], which owns the value together with its change listeners.
//! Setters return the field they changed, or `None` when the new value equals
//! the current one, so listeners only hear about real changes.

use std::convert::Infallible;
use std::fmt;

/// A configuration value whose fields can be individually identified
pub trait Parameters: Clone + fmt::Debug {
    /// Identifies a single field of the parameters
    type Field: Copy + fmt::Debug + Eq;
}

/// Parameters of a layout algorithm, which always carry a random seed
pub trait LayoutParameters: Parameters {
    fn seed(&self) -> u64;

    fn set_seed(&mut self, seed: u64) -> Option<Self::Field>;
}

/// Store `value` in `slot` and report `field` if that changed anything
pub fn assign<T: PartialEq, F>(slot: &mut T, value: T, field: F) -> Option<F> {
    if *slot == value {
        return None;
    }
    *slot = value;
    Some(field)
}

/// A process-random seed, used when the caller doesn't pick one
pub fn random_seed() -> u64 {
    rand::random()
}

/// Handle returned by [`Observed::on_change`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type ChangeListener<P> = Box<dyn FnMut(<P as Parameters>::Field, &P) + Send>;

/// Parameters together with the listeners interested in their changes
pub struct Observed<P: Parameters> {
    value: P,
    listeners: Vec<(ListenerId, ChangeListener<P>)>,
    next_id: u64,
}

impl<P: Parameters> Observed<P> {
    pub fn new(value: P) -> Self {
        Self {
            value,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self) -> &P {
        &self.value
    }

    /// Independent copy of the current value, without listeners
    pub fn snapshot(&self) -> P {
        self.value.clone()
    }

    /// Register a listener called with the changed field and the new value
    pub fn on_change(&mut self, listener: impl FnMut(P::Field, &P) + Send + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if no listener was registered under this id
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Apply a setter and notify the listeners if it changed a field
    ///
    /// Returns whether anything changed.
    pub fn update(&mut self, setter: impl FnOnce(&mut P) -> Option<P::Field>) -> bool {
        match self.try_update(|value| Ok::<_, Infallible>(setter(value))) {
            Ok(changed) => changed,
            Err(never) => match never {},
        }
    }

    /// Like [`Observed::update`], for setters that validate their input
    ///
    /// # Errors
    /// Forwards the setter error, in which case nobody is notified
    pub fn try_update<E>(
        &mut self,
        setter: impl FnOnce(&mut P) -> Result<Option<P::Field>, E>,
    ) -> Result<bool, E> {
        let Some(field) = setter(&mut self.value)? else {
            return Ok(false);
        };
        for (_, listener) in &mut self.listeners {
            listener(field, &self.value);
        }
        Ok(true)
    }
}

impl<P: Parameters + Default> Default for Observed<P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<P: Parameters> fmt::Debug for Observed<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observed")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RandomLayoutField, RandomLayoutParameters};
    use crate::Rect;
    use std::sync::{Arc, Mutex};
    use test_log::test;

    fn recorded(
        observed: &mut Observed<RandomLayoutParameters>,
    ) -> Arc<Mutex<Vec<RandomLayoutField>>> {
        let fields = Arc::new(Mutex::new(Vec::new()));
        let sink = fields.clone();
        observed.on_change(move |field, _| sink.lock().unwrap().push(field));
        fields
    }

    #[test]
    fn notifies_the_changed_field() {
        let mut observed = Observed::new(RandomLayoutParameters::with_seed(1));
        let fields = recorded(&mut observed);

        assert!(observed.update(|p| p.set_seed(2)));
        assert!(observed.update(|p| p.set_bounds(Rect::new(0.0, 0.0, 10.0, 10.0))));

        assert_eq!(
            *fields.lock().unwrap(),
            vec![RandomLayoutField::Seed, RandomLayoutField::Bounds]
        );
        assert_eq!(observed.get().seed(), 2);
    }

    #[test]
    fn setting_the_current_value_is_silent() {
        let mut observed = Observed::new(RandomLayoutParameters::with_seed(7));
        let fields = recorded(&mut observed);

        assert!(!observed.update(|p| p.set_seed(7)));
        assert!(fields.lock().unwrap().is_empty());
    }

    #[test]
    fn removed_listeners_are_not_called() {
        let mut observed = Observed::new(RandomLayoutParameters::with_seed(7));
        let calls = Arc::new(Mutex::new(0));
        let sink = calls.clone();
        let id = observed.on_change(move |_, _| *sink.lock().unwrap() += 1);

        assert!(observed.remove_listener(id));
        assert!(!observed.remove_listener(id));
        observed.update(|p| p.set_seed(8));
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn snapshots_do_not_alias() {
        let mut observed = Observed::new(RandomLayoutParameters::with_seed(3));
        let snapshot = observed.snapshot();
        observed.update(|p| p.set_seed(4));
        assert_eq!(snapshot.seed(), 3);
        assert_eq!(observed.get().seed(), 4);
    }

    #[test]
    fn default_seeds_are_random() {
        assert_ne!(
            RandomLayoutParameters::default().seed(),
            RandomLayoutParameters::default().seed()
        );
    }
}

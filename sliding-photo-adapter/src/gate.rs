/// Which animation driver owns the shared surface transform and backdrop alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Driver {
    /// The interactive dismiss gesture, including its snap-back/dismiss follow-through.
    Gesture,
    /// A committed present/dismiss transition.
    Transition,
}

/// Proof of ownership handed out by [`TransitionGate`].
///
/// Tokens are neither `Clone` nor `Copy`: releasing consumes the token, so a completion can only
/// be reported once.
#[derive(Debug, PartialEq, Eq)]
pub struct OwnerToken {
    driver: Driver,
    generation: u64,
}

impl OwnerToken {
    pub fn driver(&self) -> Driver {
        self.driver
    }
}

/// Single-owner lock for the state every animation driver mutates.
///
/// A driver must hold the current token before writing surface transform / backdrop alpha and
/// before reporting completion. Preempting bumps the generation, so the previous holder's token
/// goes stale and its late completion is ignored.
#[derive(Clone, Debug, Default)]
pub struct TransitionGate {
    holder: Option<(Driver, u64)>,
    next_generation: u64,
}

impl TransitionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holder(&self) -> Option<Driver> {
        self.holder.map(|(driver, _)| driver)
    }

    pub fn is_held(&self) -> bool {
        self.holder.is_some()
    }

    /// Acquires the gate if nobody holds it.
    pub fn try_acquire(&mut self, driver: Driver) -> Option<OwnerToken> {
        if self.holder.is_some() {
            return None;
        }
        Some(self.grant(driver))
    }

    /// Takes the gate from whoever holds it, invalidating their token.
    pub fn preempt(&mut self, driver: Driver) -> OwnerToken {
        adebug!(holder = ?self.holder, ?driver, "TransitionGate: preempt");
        self.grant(driver)
    }

    pub fn is_current(&self, token: &OwnerToken) -> bool {
        self.holder == Some((token.driver, token.generation))
    }

    /// Releases the gate. Returns `false` (and changes nothing) for a stale token.
    pub fn release(&mut self, token: OwnerToken) -> bool {
        if !self.is_current(&token) {
            return false;
        }
        self.holder = None;
        true
    }

    fn grant(&mut self, driver: Driver) -> OwnerToken {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        self.holder = Some((driver, generation));
        OwnerToken { driver, generation }
    }
}

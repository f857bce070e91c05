#![allow(dead_code)]

use std::cell::Cell;

use hashchain_core::{chain::Chain, Clock, FixedClock};
use rand::{distributions::Alphanumeric, Rng};

pub const T: u64 = 1_700_000_000;

/// Advances one second on every read.
pub struct StepClock {
    next: Cell<u64>,
}

impl StepClock {
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: Cell::new(start),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> u64 {
        let now = self.next.get();
        self.next.set(now + 1);
        now
    }
}

pub fn random_payload<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(0..48);
    (0..len)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// A chain at `difficulty` with `payloads` appended, stamped at `T`.
pub fn build_chain(difficulty: usize, payloads: &[&str]) -> Chain<FixedClock> {
    let mut chain = Chain::with_clock(difficulty, FixedClock(T)).expect("valid difficulty");
    for payload in payloads {
        chain.append(*payload).expect("mining succeeds");
    }
    chain
}

//! This module defines the `Machine` struct, an immutable compiled form of a
//! machine description, and the simulation loop that drives a fresh `Tape`
//! through transitions until none applies.

use crate::tape::Tape;
use crate::types::{Description, Direction};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Interned state identifier. States are resolved to dense ids at
/// construction so the hot loop never touches state names.
type StateId = usize;

/// A compiled transition: everything a step needs, with states resolved.
struct Action<S> {
    write: S,
    direction: Direction,
    next: StateId,
}

/// An immutable deterministic Turing machine.
///
/// Construction compiles a [`Description`] into a lookup table indexed by
/// (state, read symbol). When a description declares several transitions for
/// the same pair, only the first-declared one is stored, so lookup stays
/// O(1) while matching the observable behavior of scanning the transition
/// list in order and taking the first hit.
///
/// A machine is never mutated after construction and holds no interior
/// state, so a single instance can serve any number of simulations,
/// including concurrent ones from multiple threads.
pub struct Machine<S> {
    description: Description<S>,
    /// Interned state names, indexed by `StateId`.
    names: Vec<String>,
    index: HashMap<(StateId, S), Action<S>>,
    start: StateId,
    accepting: HashSet<StateId>,
}

impl<S> Machine<S>
where
    S: Clone + Eq + Hash,
{
    /// Compiles a description into a machine.
    ///
    /// Descriptions are taken as given: nothing checks that the transition
    /// table is total or functional, that referenced states and symbols are
    /// declared, or that the machine ever halts. States mentioned only in
    /// transitions are interned alongside the declared ones, so such
    /// descriptions still run (a state with no outgoing transitions simply
    /// halts the machine).
    pub fn new(description: Description<S>) -> Self {
        let mut ids: HashMap<String, StateId> = HashMap::new();
        let mut names: Vec<String> = Vec::new();
        let mut intern = |name: &str| -> StateId {
            if let Some(&id) = ids.get(name) {
                id
            } else {
                let id = names.len();
                ids.insert(name.to_string(), id);
                names.push(name.to_string());
                id
            }
        };

        for state in &description.states {
            intern(state);
        }
        let start = intern(&description.start_state);
        let accepting = description
            .accept_states
            .iter()
            .map(|state| intern(state))
            .collect();

        let mut index = HashMap::new();
        for transition in &description.delta {
            let from = intern(&transition.from);
            let next = intern(&transition.to);
            // First-declared transition wins for a duplicated (state, read) pair.
            index.entry((from, transition.read.clone())).or_insert(Action {
                write: transition.write.clone(),
                direction: transition.direction,
                next,
            });
        }

        Self {
            description,
            names,
            index,
            start,
            accepting,
        }
    }

    /// Returns the description this machine was compiled from.
    pub fn description(&self) -> &Description<S> {
        &self.description
    }

    /// Begins a run of this machine on `input`, for step-by-step execution.
    ///
    /// Each run owns a fresh tape seeded with the input (head on the first
    /// cell) and its own current state, so runs are independent of each
    /// other.
    pub fn run<I>(&self, input: I) -> Run<'_, S>
    where
        I: IntoIterator<Item = S>,
    {
        Run {
            machine: self,
            tape: Tape::new(input, self.description.blank.clone()),
            state: self.start,
            steps: 0,
        }
    }

    /// Simulates the machine on `input` and reports acceptance.
    ///
    /// The machine runs until no transition matches the current state and
    /// the symbol under the head; that is the only halting condition. The
    /// result is whether the halting state is an accepting state. A machine
    /// whose start state has no matching transition for the first symbol
    /// halts immediately, so the result is then simply whether the start
    /// state accepts.
    ///
    /// There is no step ceiling: on a non-halting machine this call never
    /// returns. Use [`simulate_with_limit`](Self::simulate_with_limit) when
    /// execution must be bounded.
    pub fn simulate<I>(&self, input: I) -> bool
    where
        I: IntoIterator<Item = S>,
    {
        let mut run = self.run(input);
        while run.step() {}
        run.accepted()
    }

    /// Simulates the machine on `input`, giving up after `max_steps` steps.
    ///
    /// Returns `Some(accepted)` if the machine halts within the limit and
    /// `None` otherwise. Halting itself costs no step, so a machine that
    /// halts after exactly `max_steps` steps still yields a verdict.
    pub fn simulate_with_limit<I>(&self, input: I, max_steps: usize) -> Option<bool>
    where
        I: IntoIterator<Item = S>,
    {
        let mut run = self.run(input);
        while !run.halted() {
            if run.steps() == max_steps {
                return None;
            }
            run.step();
        }
        Some(run.accepted())
    }

    fn action(&self, state: StateId, symbol: S) -> Option<&Action<S>> {
        self.index.get(&(state, symbol))
    }
}

impl Machine<char> {
    /// Convenience for character machines: simulates on the characters of
    /// `input`.
    pub fn simulate_str(&self, input: &str) -> bool {
        self.simulate(input.chars())
    }
}

/// A single in-progress run of a machine on one input.
///
/// Exposes the current state name and step count for tracing; tape contents
/// stay private.
pub struct Run<'m, S> {
    machine: &'m Machine<S>,
    tape: Tape<S>,
    state: StateId,
    steps: usize,
}

impl<S> Run<'_, S>
where
    S: Clone + Eq + Hash,
{
    /// Executes one transition.
    ///
    /// Returns `false` without changing anything if no transition matches
    /// the current state and the symbol under the head, i.e. the run has
    /// halted.
    pub fn step(&mut self) -> bool {
        match self.machine.action(self.state, self.tape.read()) {
            Some(action) => {
                self.tape.write(action.write.clone());
                match action.direction {
                    Direction::Left => self.tape.move_left(),
                    Direction::Right => self.tape.move_right(),
                    Direction::Stay => {}
                }
                self.state = action.next;
                self.steps += 1;
                true
            }
            None => false,
        }
    }

    /// Checks whether the run has halted: no transition matches the current
    /// state and the symbol under the head.
    pub fn halted(&self) -> bool {
        self.machine.action(self.state, self.tape.read()).is_none()
    }

    /// Returns the name of the current state.
    pub fn state(&self) -> &str {
        &self.machine.names[self.state]
    }

    /// Returns the number of transitions executed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Checks whether the current state is an accepting state. Only
    /// meaningful as a verdict once the run has halted.
    pub fn accepted(&self) -> bool {
        self.machine.accepting.contains(&self.state)
    }
}

impl<S: fmt::Display> fmt::Display for Machine<S> {
    /// Renders the full machine tuple for diagnostics. This format has no
    /// parsing counterpart and is not stable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.description;
        writeln!(f, "machine {}", d.name)?;
        writeln!(f, "  states:   {}", d.states.join(", "))?;
        writeln!(f, "  input:    {}", join_symbols(&d.input_alphabet))?;
        writeln!(f, "  alphabet: {}", join_symbols(&d.tape_alphabet))?;
        writeln!(f, "  blank:    {}", d.blank)?;
        writeln!(f, "  start:    {}", d.start_state)?;
        writeln!(f, "  accept:   {}", d.accept_states.join(", "))?;
        writeln!(f, "  delta:")?;
        for t in &d.delta {
            writeln!(
                f,
                "    {}, {} -> {}, {}, {}",
                t.from, t.read, t.write, t.direction, t.to
            )?;
        }
        Ok(())
    }
}

fn join_symbols<S: fmt::Display>(symbols: &[S]) -> String {
    symbols
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

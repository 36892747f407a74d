//! Given-When-Then harness for reducers.
//!
//! A test sets the state and the action, runs the reducer once, then checks
//! the resulting state, the returned effects and, for async tests, the
//! actions those effects feed back.

#![allow(clippy::module_name_repetitions)]

use backoffice_core::{effect::Effect, reducer::Reducer};

type StateAssertion<S> = Box<dyn FnOnce(&S)>;
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;
type FeedbackAssertion<A> = Box<dyn FnOnce(&[A])>;

/// Fluent reducer test.
///
/// # Example
///
/// ```ignore
/// use backoffice_testing::{ReducerTest, assertions};
///
/// ReducerTest::new(MutationReducer::new(Login::new(&AuthConfig::default())))
///     .with_env(environment())
///     .given_state(MutationState::Idle)
///     .when_action(MutationAction::Submit { payload })
///     .then_state(|state| assert!(state.is_in_flight()))
///     .then_effects(assertions::assert_has_future_effect)
///     .run();
/// ```
pub struct ReducerTest<R>
where
    R: Reducer,
{
    reducer: R,
    environment: Option<R::Environment>,
    initial_state: Option<R::State>,
    action: Option<R::Action>,
    state_assertions: Vec<StateAssertion<R::State>>,
    effect_assertions: Vec<EffectAssertion<R::Action>>,
    feedback_assertions: Vec<FeedbackAssertion<R::Action>>,
}

impl<R> ReducerTest<R>
where
    R: Reducer,
{
    /// Start a test for `reducer`.
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            action: None,
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
            feedback_assertions: Vec::new(),
        }
    }

    /// Environment handed to the reducer.
    #[must_use]
    pub fn with_env(mut self, env: R::Environment) -> Self {
        self.environment = Some(env);
        self
    }

    /// Given: the state before the action.
    #[must_use]
    pub fn given_state(mut self, state: R::State) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// When: the action under test.
    #[must_use]
    pub fn when_action(mut self, action: R::Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Then: check the state after the action.
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&R::State) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Then: check the effects returned by the reducer.
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<R::Action>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Then: check the actions fed back once every effect has run.
    ///
    /// Only honored by [`run_with_feedback`](Self::run_with_feedback).
    #[must_use]
    pub fn then_feedback<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[R::Action]) + 'static,
    {
        self.feedback_assertions.push(Box::new(assertion));
        self
    }

    /// Run the reducer and every state and effect assertion.
    ///
    /// # Panics
    ///
    /// Panics if the state, action or environment is missing, or if an
    /// assertion fails.
    pub fn run(self) {
        let _ = self.reduce();
    }

    /// Like [`run`](Self::run), then awaits each returned effect in order and
    /// checks the actions they produced.
    ///
    /// # Panics
    ///
    /// Same as [`run`](Self::run), plus failing feedback assertions.
    pub async fn run_with_feedback(mut self) {
        let feedback_assertions = std::mem::take(&mut self.feedback_assertions);
        let effects = self.reduce();

        let feedback = collect_feedback(effects).await;
        for assertion in feedback_assertions {
            assertion(&feedback);
        }
    }

    #[allow(clippy::expect_used)]
    fn reduce(self) -> Vec<Effect<R::Action>> {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");
        let action = self.action.expect("Action must be set with when_action()");
        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        let effects = self.reducer.reduce(&mut state, action, &env).into_vec();

        for assertion in self.state_assertions {
            assertion(&state);
        }
        for assertion in self.effect_assertions {
            assertion(&effects);
        }
        effects
    }
}

/// Await `effects` in order and return the actions they produced.
pub async fn collect_feedback<A>(effects: impl IntoIterator<Item = Effect<A>>) -> Vec<A> {
    let mut feedback = Vec::new();
    for effect in effects {
        if let Effect::Future(future) = effect {
            if let Some(action) = future.await {
                feedback.push(action);
            }
        }
    }
    feedback
}

/// Assertions on effect lists.
pub mod assertions {
    use backoffice_core::effect::Effect;

    /// Nothing to run: no effects, or only `Effect::None`.
    ///
    /// # Panics
    ///
    /// Panics if any effect does work.
    pub fn assert_no_effects<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Exactly `expected` effects.
    ///
    /// # Panics
    ///
    /// Panics if the count differs.
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {expected} effects, but found {}",
            effects.len()
        );
    }

    /// At least one `Effect::Future`.
    ///
    /// # Panics
    ///
    /// Panics if no future effect is present.
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::{SmallVec, smallvec};

    #[derive(Clone, Debug, PartialEq)]
    enum LightAction {
        Toggle,
        ToggleLater,
    }

    struct LightReducer;

    impl Reducer for LightReducer {
        type State = bool;
        type Action = LightAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut bool,
            action: LightAction,
            _env: &(),
        ) -> SmallVec<[Effect<LightAction>; 4]> {
            match action {
                LightAction::Toggle => {
                    *state = !*state;
                    smallvec![Effect::None]
                },
                LightAction::ToggleLater => {
                    smallvec![Effect::future(async { Some(LightAction::Toggle) })]
                },
            }
        }
    }

    #[test]
    fn test_state_and_effects() {
        ReducerTest::new(LightReducer)
            .with_env(())
            .given_state(false)
            .when_action(LightAction::Toggle)
            .then_state(|on| assert!(*on))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[tokio::test]
    async fn test_feedback_collected() {
        ReducerTest::new(LightReducer)
            .with_env(())
            .given_state(false)
            .when_action(LightAction::ToggleLater)
            .then_state(|on| assert!(!*on))
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .then_feedback(|actions| assert_eq!(actions, [LightAction::Toggle]))
            .run_with_feedback()
            .await;
    }

    #[tokio::test]
    async fn test_collect_feedback_skips_none() {
        let effects = vec![
            Effect::None,
            Effect::future(async { None }),
            Effect::future(async { Some(LightAction::Toggle) }),
        ];

        assert_eq!(collect_feedback(effects).await, vec![LightAction::Toggle]);
    }
}

use soroban_sdk::Env;

/// Randomness consumed by lottery draws.
pub trait RandomSource {
    /// Returns a value in `0..upper`. Callers never pass zero.
    fn next_below(&mut self, upper: u64) -> u64;
}

/// Draws from the ledger PRNG.
pub struct LedgerRandom<'a> {
    env: &'a Env,
}

impl<'a> LedgerRandom<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }
}

impl RandomSource for LedgerRandom<'_> {
    fn next_below(&mut self, upper: u64) -> u64 {
        self.env.prng().gen_range::<u64>(0..upper)
    }
}

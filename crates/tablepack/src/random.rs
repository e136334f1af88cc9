//! Random value generator for round-trip testing.
//!
//! Generates arbitrary [`Value`] trees with configurable per-variant odds.
//! Integers are drawn across every wire width so boundary encodings get
//! exercised; strings are drawn from a small token set so the pool sees
//! repeats.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{INT_MAX, INT_MIN};
use crate::value::{Table, Value};

/// Relative odds for each generated node type.
#[derive(Debug, Clone)]
pub struct NodeOdds {
    pub boolean: u32,
    pub int: u32,
    pub float: u32,
    pub string: u32,
    pub bytes: u32,
    pub table: u32,
}

impl Default for NodeOdds {
    fn default() -> Self {
        Self {
            boolean: 2,
            int: 10,
            float: 4,
            string: 8,
            bytes: 1,
            table: 3,
        }
    }
}

impl NodeOdds {
    fn total(&self) -> u32 {
        self.boolean + self.int + self.float + self.string + self.bytes + self.table
    }
}

/// Options for [`RandomValue`].
#[derive(Debug, Clone)]
pub struct RandomValueOptions {
    pub odds: NodeOdds,
    /// Tables stop nesting past this depth.
    pub max_depth: usize,
    /// Upper bound on entries per generated table part.
    pub max_entries: usize,
}

impl Default for RandomValueOptions {
    fn default() -> Self {
        Self {
            odds: NodeOdds::default(),
            max_depth: 6,
            max_entries: 12,
        }
    }
}

const TOKENS: [&str; 12] = [
    "id", "name", "kind", "count", "payload", "ok", "left", "right", "parent", "tags", "x", "y",
];

/// Seeded random value generator.
pub struct RandomValue {
    rng: StdRng,
    options: RandomValueOptions,
}

impl RandomValue {
    pub fn new(seed: u64) -> Self {
        Self::with_options(seed, RandomValueOptions::default())
    }

    pub fn with_options(seed: u64, options: RandomValueOptions) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            options,
        }
    }

    /// Generates one value; the root is always a table.
    pub fn generate(&mut self) -> Value {
        Value::Table(self.gen_table(0))
    }

    fn gen_node(&mut self, depth: usize) -> Value {
        let odds = self.options.odds.clone();
        let mut roll = self.rng.gen_range(0..odds.total());
        if roll < odds.boolean {
            return Value::Bool(self.rng.gen());
        }
        roll -= odds.boolean;
        if roll < odds.int {
            return Value::Int(self.gen_int());
        }
        roll -= odds.int;
        if roll < odds.float {
            return Value::Float(self.rng.gen_range(-1.0e6..1.0e6));
        }
        roll -= odds.float;
        if roll < odds.string {
            return Value::Str(self.gen_string());
        }
        roll -= odds.string;
        if roll < odds.bytes {
            let len = self.rng.gen_range(0..32);
            return Value::Bytes((0..len).map(|_| self.rng.gen()).collect());
        }
        if depth >= self.options.max_depth {
            return Value::Int(self.gen_int());
        }
        Value::Table(self.gen_table(depth))
    }

    /// Integers spread across all seven widths, both signs.
    fn gen_int(&mut self) -> i64 {
        let bits = self.rng.gen_range(0..52u32);
        let magnitude = if bits == 0 {
            self.rng.gen_range(0..256)
        } else {
            let base = 1i64 << bits;
            base + self.rng.gen_range(0..base.min(1 << 20))
        };
        if self.rng.gen_bool(0.5) {
            magnitude.min(INT_MAX)
        } else {
            (-magnitude).max(INT_MIN)
        }
    }

    fn gen_string(&mut self) -> String {
        let token = TOKENS[self.rng.gen_range(0..TOKENS.len())];
        if self.rng.gen_bool(0.3) {
            format!("{token}_{}", self.rng.gen_range(0..100u32))
        } else {
            token.to_owned()
        }
    }

    fn gen_table(&mut self, depth: usize) -> Table {
        let mut table = Table::new();
        let array_len = self.rng.gen_range(0..=self.options.max_entries);
        for _ in 0..array_len {
            table.push(self.gen_node(depth + 1));
        }
        let hash_len = self.rng.gen_range(0..=self.options.max_entries);
        for _ in 0..hash_len {
            let key = match self.rng.gen_range(0..4u32) {
                0 => Value::Int(self.rng.gen_range(1000..2000)),
                1 => Value::Bool(self.rng.gen()),
                _ => Value::Str(self.gen_string()),
            };
            table.insert(key, self.gen_node(depth + 1));
        }
        table
    }
}

use std::str::FromStr;

use serde::Serialize;

use crate::{
    cache::{Cache, Geometry, IsCache},
    error::ConfigError,
    replace::{fifo::Fifo, lru::Lru},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Assoc {
    /// One way per set.
    Direct,
    /// A single set holding every block.
    Full,
    Ways(u64),
}

impl FromStr for Assoc {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(Assoc::Direct),
            "assoc" => Ok(Assoc::Full),
            _ => match s.strip_prefix("assoc:") {
                Some(n) => parse_pow2("associativity", n).map(Assoc::Ways),
                None => Err(ConfigError::UnknownAssoc(s.to_owned())),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    Lru,
    Fifo,
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lru" => Ok(Policy::Lru),
            "fifo" => Ok(Policy::Fifo),
            _ => Err(ConfigError::UnknownPolicy(s.to_owned())),
        }
    }
}

/// Upper bound on lines per cache, keeping both cache arrays allocatable.
pub const MAX_LINES: u64 = 1 << 26;

fn parse_pow2(what: &'static str, value: &str) -> Result<u64, ConfigError> {
    let n: u64 = value.parse().map_err(|_| ConfigError::InvalidNumber {
        what,
        value: value.to_owned(),
    })?;
    if !n.is_power_of_two() {
        return Err(ConfigError::NotPowerOfTwo { what, value: n });
    }
    Ok(n)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Config {
    pub size: u64,
    pub assoc: Assoc,
    pub policy: Policy,
    pub block_size: u64,
}

impl Config {
    /// Builds a config from the `<size> <assoc> <policy> <block_size>` tokens.
    /// Whether the tokens describe a usable cache is checked by [`Config::geometry`].
    pub fn parse(size: &str, assoc: &str, policy: &str, block_size: &str) -> Result<Self, ConfigError> {
        let size = parse_pow2("cache size", size)?;
        let block_size = parse_pow2("block size", block_size)?;
        Ok(Config {
            size,
            assoc: assoc.parse()?,
            policy: policy.parse()?,
            block_size,
        })
    }

    pub fn geometry(&self) -> Result<Geometry, ConfigError> {
        let blocks = self.size / self.block_size;
        let (n_sets, n_ways) = match self.assoc {
            Assoc::Direct => (blocks, 1),
            Assoc::Full => (1, blocks),
            Assoc::Ways(ways) => (blocks / ways, ways),
        };
        if n_sets == 0 || n_ways == 0 {
            return Err(ConfigError::EmptyGeometry {
                size: self.size,
                block_size: self.block_size,
                ways: n_ways,
            });
        }
        if blocks > MAX_LINES {
            return Err(ConfigError::TooLarge {
                lines: blocks,
                max: MAX_LINES,
            });
        }
        Ok(Geometry {
            block_size: self.block_size,
            n_sets: n_sets as usize,
            n_ways: n_ways as usize,
        })
    }

    /// The baseline cache and its next-block prefetching twin.
    pub fn to_caches(&self, geometry: Geometry) -> [Box<dyn IsCache>; 2] {
        [false, true].map(|prefetch| {
            let name = format!("Prefetch {}", prefetch as u8);
            match self.policy {
                Policy::Lru => {
                    Box::new(Cache::new(name, geometry, prefetch, Lru)) as Box<dyn IsCache>
                }
                Policy::Fifo => {
                    Box::new(Cache::new(name, geometry, prefetch, Fifo)) as Box<dyn IsCache>
                }
            }
        })
    }
}

//! Pillar - Reflection category of a declaration

use serde::{Deserialize, Serialize};

/// One of the four fixed reflection categories inside a module
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Pillar {
    Vision,
    Proposito,
    Creencias,
    Estrategias,
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pillar::Vision => write!(f, "Vision"),
            Pillar::Proposito => write!(f, "Proposito"),
            Pillar::Creencias => write!(f, "Creencias"),
            Pillar::Estrategias => write!(f, "Estrategias"),
        }
    }
}

impl std::str::FromStr for Pillar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vision" | "visión" => Ok(Pillar::Vision),
            "proposito" | "propósito" => Ok(Pillar::Proposito),
            "creencias" => Ok(Pillar::Creencias),
            "estrategias" => Ok(Pillar::Estrategias),
            _ => Err(format!("Unknown pillar: {}", s)),
        }
    }
}

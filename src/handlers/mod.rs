// Two security tiers: public (no auth) and protected (bearer token).
pub mod protected;
pub mod public;

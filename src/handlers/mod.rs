// Public (no token) and protected (auth gate) handler tiers
pub mod protected;
pub mod public;

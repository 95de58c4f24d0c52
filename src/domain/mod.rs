// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Entities and the rules that govern them. Persistence lives in
// src/store/, transport in src/api/.
//
// ============================================================================

pub mod order;

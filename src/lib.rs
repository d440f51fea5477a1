// ==============================================================================
// lib.rs - Pharmacogenomic Risk Processor Library
// ==============================================================================
// Description: Library interface for pharmacogenomic risk processing modules
// Author: Matt Barham
// Created: 2025-11-18
// Modified: 2025-11-24
// Version: 1.2.0
// ==============================================================================

pub mod composer;
pub mod explain;
pub mod models;
pub mod parsers;
pub mod phenotype;
pub mod processor;
pub mod risk;
pub mod storage;
pub mod validator;

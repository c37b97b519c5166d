//! Data models for job board entities.
//!
//! - `User`, `Role`, `AuthResponse`, `Registration`: accounts and auth
//! - `Job`, `JobFilter`: postings and listing filters
//! - `Application`, `NewApplication`: candidate applications
//! - `Challenge`, `ChallengeResult`, `GenerateChallenges`: take-home assessments
//! - `AdminStats`, `FormField`, `UserQuery`: admin configuration
//! - Payment types: `PaymentIntentRequest`, `PaymentIntent`, `SubscriptionStatus`
//!
//! Most models keep fields they do not name in an `extra` map so that
//! backend additions survive a round trip.

pub mod admin;
pub mod application;
pub mod challenge;
pub mod job;
pub mod payment;
pub mod user;

pub use admin::{AdminStats, FormField, UserQuery};
pub use application::{Application, NewApplication};
pub use challenge::{Challenge, ChallengeResult, ChallengeTopic, GenerateChallenges, ScoreUpdate};
pub use job::{Job, JobFilter};
pub use payment::{
    CheckoutSessionRequest, PaymentIntent, PaymentIntentRequest, PaymentTier, SubscriptionStatus,
};
pub use user::{AuthResponse, Registration, Role, User};

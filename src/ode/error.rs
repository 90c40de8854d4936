use thiserror::Error;

/// Error surface of the integrator core.
///
/// Inner primitives (Newton, the projector, stage kernels) report failure as
/// a plain boolean and keep their diagnostic counters queryable; it is the
/// layer that converts a primitive failure into a caller-visible outcome
/// (step kernel, advance, driver) that attaches one of these variants.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegratorError
{
    /// `in_domain` returned `false` at step entry.
    #[error("state left the admissible domain")]
    DomainViolation,

    /// A stage produced `NaN`/`±inf` (explicit kernels only; implicit
    /// kernels surface this through the Newton solve instead).
    #[error("a stage evaluation produced a non-finite value")]
    NonFinite,

    /// Newton hit its iteration cap in an implicit stage, the block IRK
    /// solve, or the projector.
    #[error("Newton iteration did not converge")]
    NonConvergent,

    /// The LU factorization reported rank deficiency: stage Jacobian, mass
    /// matrix `E`/`A`, or the KKT system.
    #[error("linear system is numerically singular")]
    Singular,

    /// The substepping state machine exceeded `max_substeps^2` halvings.
    #[error("substepping exhausted its retry budget")]
    SubstepExhausted,

    /// The projector's saddle-point KKT matrix was singular.
    #[error("projection KKT system is numerically singular")]
    SingularProjection,

    /// `Tableau::check` failed: structural shape, row-sum, weight-sum, or an
    /// order condition did not hold.
    #[error("tableau failed its self-consistency check")]
    InconsistentTableau,
}

//! RepoMap Application Layer (UseCase)

mod repomap_usecase;

pub use repomap_usecase::{RepoMapUseCase, RepoMapUseCaseImpl, RepoMapInput, RepoMapOutput};

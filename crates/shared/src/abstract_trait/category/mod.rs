mod command;
mod query;

pub use self::command::{
    CategoryCommandRepositoryTrait, CategoryCommandServiceTrait, DynCategoryCommandRepository,
    DynCategoryCommandService,
};
pub use self::query::{
    CategoryQueryRepositoryTrait, CategoryQueryServiceTrait, DynCategoryQueryRepository,
    DynCategoryQueryService,
};

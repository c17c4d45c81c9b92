use mockall::mock;

use super::{
    IngredientReader, IngredientWriter, RecipeReader, RecipeWriter, RelationReader,
    RelationWriter, RepositoryResult, SubscriptionReader, SubscriptionWriter, TagReader,
    TagWriter, UserReader, UserWriter,
};
use crate::domain::{
    ingredient::{Ingredient, IngredientListQuery, NewIngredient, UpdateIngredient},
    recipe::{NewRecipe, Recipe, RecipeListQuery, UpdateRecipe},
    relation::{NewRelation, RelationKind, UserRecipeRelation},
    shopping_list::CartLine,
    subscription::{FollowedAuthorsQuery, NewSubscription, Subscription},
    tag::{NewTag, Tag, UpdateTag},
    user::{NewUser, User},
};

mock! {
    pub TagReader {}

    impl TagReader for TagReader {
        fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
        fn get_tag_by_slug(&self, slug: &str) -> RepositoryResult<Option<Tag>>;
        fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
        fn list_tags_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Tag>>;
    }
}

mock! {
    pub TagWriter {}

    impl TagWriter for TagWriter {
        fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
        fn update_tag(&self, tag_id: i32, updates: &UpdateTag) -> RepositoryResult<Tag>;
        fn delete_tag(&self, tag_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub IngredientReader {}

    impl IngredientReader for IngredientReader {
        fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<Ingredient>>;
        fn list_ingredients(&self, query: IngredientListQuery) -> RepositoryResult<Vec<Ingredient>>;
        fn list_ingredients_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Ingredient>>;
    }
}

mock! {
    pub IngredientWriter {}

    impl IngredientWriter for IngredientWriter {
        fn create_ingredient(&self, new_ingredient: &NewIngredient) -> RepositoryResult<Ingredient>;
        fn update_ingredient(&self, ingredient_id: i32, updates: &UpdateIngredient) -> RepositoryResult<Ingredient>;
        fn delete_ingredient(&self, ingredient_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    /// Single mock covering every repository trait, for services that need
    /// several of them at once.
    pub Repo {}

    impl TagReader for Repo {
        fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
        fn get_tag_by_slug(&self, slug: &str) -> RepositoryResult<Option<Tag>>;
        fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
        fn list_tags_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Tag>>;
    }

    impl IngredientReader for Repo {
        fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<Ingredient>>;
        fn list_ingredients(&self, query: IngredientListQuery) -> RepositoryResult<Vec<Ingredient>>;
        fn list_ingredients_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Ingredient>>;
    }

    impl RecipeReader for Repo {
        fn get_recipe_by_id(&self, id: i32) -> RepositoryResult<Option<Recipe>>;
        fn get_recipe_id_by_short_code(&self, code: &str) -> RepositoryResult<Option<i32>>;
        fn short_code_exists(&self, code: &str) -> RepositoryResult<bool>;
        fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<(usize, Vec<Recipe>)>;
    }

    impl RecipeWriter for Repo {
        fn create_recipe(&self, new_recipe: &NewRecipe, short_code: &str) -> RepositoryResult<Recipe>;
        fn update_recipe(&self, recipe_id: i32, updates: &UpdateRecipe) -> RepositoryResult<Recipe>;
        fn delete_recipe(&self, recipe_id: i32) -> RepositoryResult<()>;
    }

    impl RelationReader for Repo {
        fn has_relation(&self, user_id: i32, recipe_id: i32, kind: RelationKind) -> RepositoryResult<bool>;
        fn list_relation_kinds(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<Vec<RelationKind>>;
        fn list_cart_lines(&self, user_id: i32) -> RepositoryResult<Vec<CartLine>>;
    }

    impl RelationWriter for Repo {
        fn create_relation(&self, new_relation: &NewRelation) -> RepositoryResult<UserRecipeRelation>;
        fn delete_relation(&self, user_id: i32, recipe_id: i32, kind: RelationKind) -> RepositoryResult<()>;
    }

    impl SubscriptionReader for Repo {
        fn is_subscribed(&self, user_id: i32, author_id: i32) -> RepositoryResult<bool>;
        fn list_followed_authors(&self, query: FollowedAuthorsQuery) -> RepositoryResult<(usize, Vec<User>)>;
    }

    impl SubscriptionWriter for Repo {
        fn create_subscription(&self, new_subscription: &NewSubscription) -> RepositoryResult<Subscription>;
        fn delete_subscription(&self, user_id: i32, author_id: i32) -> RepositoryResult<()>;
    }

    impl UserReader for Repo {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn list_users_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<User>>;
    }

    impl UserWriter for Repo {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn set_avatar(&self, user_id: i32, avatar: Option<String>) -> RepositoryResult<User>;
        fn delete_user(&self, user_id: i32) -> RepositoryResult<()>;
    }
}

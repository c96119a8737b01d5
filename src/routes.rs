pub mod ownership;
pub mod pagination;
pub mod routes;
pub mod validation;

pub mod login {
    pub mod login_handlers;
    pub mod login_models;
}

pub mod user {
    pub mod user_handlers;
    pub mod user_models;
}

pub mod dataset {
    pub mod dataset_handlers;
    pub mod dataset_models;
}

pub mod model {
    pub mod model_handlers;
    pub mod model_models;
}

pub mod project {
    pub mod project_handlers;
    pub mod project_models;
}

pub mod prediction {
    pub mod prediction_handlers;
    pub mod prediction_models;
}

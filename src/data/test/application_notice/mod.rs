use crate::{
    data::application_notice::ApplicationNoticeRepository, error::AppError,
    model::application_notice::CreateApplicationNoticeParam,
};
use test_utils::builder::TestBuilder;

mod create;
mod notified_keys;

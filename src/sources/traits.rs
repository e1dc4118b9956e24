//! Site adapter trait definitions

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::FetchResult;
use crate::models::{Channel, Program};

/// Capability interface every EPG site adapter implements
///
/// Adapters own their HTTP session. Everything they return is plain owned
/// data so results can move freely between worker tasks.
#[async_trait]
pub trait EpgSiteAdapter: Send + Sync {
    /// Site identifier configuration entries refer to, e.g. `m.musor.tv`
    fn site_id(&self) -> &str;

    /// Fetch channel metadata for a site-local channel identifier
    ///
    /// `display_name` comes from configuration and is used as the channel's
    /// display name.
    async fn fetch_channel(&self, site_local_id: &str, display_name: &str) -> FetchResult<Channel>;

    /// Fetch channel metadata from the page of a given day
    ///
    /// The scheduler calls this with the first day of the run so channel and
    /// program pages agree on the date. Adapters whose channel page does not
    /// depend on the day keep the default.
    async fn fetch_channel_for_day(
        &self,
        site_local_id: &str,
        display_name: &str,
        _date: NaiveDate,
    ) -> FetchResult<Channel> {
        self.fetch_channel(site_local_id, display_name).await
    }

    /// Fetch every program of `channel` airing on `date`
    ///
    /// Returned programs have no stop time and may come in any order.
    async fn fetch_programs(
        &self,
        channel: &Channel,
        site_local_id: &str,
        date: NaiveDate,
    ) -> FetchResult<Vec<Program>>;
}

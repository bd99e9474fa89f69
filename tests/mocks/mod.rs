mod mock_hubspot_client;

pub use mock_hubspot_client::MockHubSpotClient;

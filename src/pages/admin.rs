use log::{error, info};

use super::Feedback;
use crate::auth::Role;
use crate::error::Error;
use crate::stores::{NewStore, Store, StoreQuery, StoreSort, StoresClient};
use crate::users::{self, NewUser, User, UserSort, UsersClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Users,
    Stores,
}

/// Administration panel: user table, store table, and creation forms
pub struct AdminPage {
    users_client: UsersClient,
    stores_client: StoresClient,
    pub tab: AdminTab,
    all_users: Vec<User>,
    /// Users after the role filter and sort are applied
    pub users: Vec<User>,
    pub stores: Vec<Store>,
    pub user_filter: Option<Role>,
    pub user_sort: UserSort,
    pub store_query: StoreQuery,
    pub loading: bool,
    pub feedback: Feedback,
    pub success: Option<String>,
}

impl AdminPage {
    pub fn new(users_client: UsersClient, stores_client: StoresClient) -> Self {
        Self {
            users_client,
            stores_client,
            tab: AdminTab::default(),
            all_users: Vec::new(),
            users: Vec::new(),
            stores: Vec::new(),
            user_filter: None,
            user_sort: UserSort::default(),
            store_query: StoreQuery::default(),
            loading: false,
            feedback: Feedback::default(),
            success: None,
        }
    }

    /// Fetch users and stores
    pub async fn load(&mut self) {
        self.loading = true;
        self.feedback.clear();
        let result = async {
            let users = self.users_client.list().await?;
            let stores = self.stores_client.list(&self.store_query).await?;
            Ok::<_, Error>((users, stores))
        }
        .await;

        self.loading = false;
        match result {
            Ok((users, stores)) => {
                self.all_users = users;
                self.stores = stores;
                self.apply_user_view();
            }
            Err(e) => {
                error!("Error fetching admin data: {}", e);
                self.feedback.show(&e, "Error loading admin data");
            }
        }
    }

    pub fn set_user_filter(&mut self, role: Option<Role>) {
        self.user_filter = role;
        self.apply_user_view();
    }

    pub fn set_user_sort(&mut self, sort: UserSort) {
        self.user_sort = sort;
        self.apply_user_view();
    }

    fn apply_user_view(&mut self) {
        self.users = users::filter_and_sort(self.all_users.clone(), self.user_filter, self.user_sort);
    }

    /// Re-query stores with a new search and sort
    pub async fn search_stores(&mut self, search: &str, sort: StoreSort) {
        self.store_query = StoreQuery::new(search, sort);
        self.loading = true;
        self.feedback.clear();
        let result = self.stores_client.list(&self.store_query).await;
        self.loading = false;
        match result {
            Ok(stores) => self.stores = stores,
            Err(e) => {
                error!("Error searching stores: {}", e);
                self.feedback.show(&e, "Error loading stores");
            }
        }
    }

    pub async fn create_user(&mut self, user: NewUser) -> bool {
        self.feedback.clear();
        self.success = None;
        match self.users_client.create(&user).await {
            Ok(created) => {
                info!("Created user {} ({})", created.email, created.role);
                self.success = Some("User created successfully".to_string());
                self.load().await;
                true
            }
            Err(e) => {
                self.feedback.show(&e, "Error creating user");
                false
            }
        }
    }

    pub async fn create_store(&mut self, store: NewStore) -> bool {
        self.feedback.clear();
        self.success = None;
        match self.stores_client.create(&store).await {
            Ok(created) => {
                info!("Created store {}", created.name);
                self.success = Some("Store created successfully".to_string());
                self.load().await;
                true
            }
            Err(e) => {
                self.feedback.show(&e, "Error creating store");
                false
            }
        }
    }

    /// Store owners, for the owner picker of the store form
    pub fn owner_candidates(&self) -> Vec<&User> {
        self.all_users
            .iter()
            .filter(|u| u.role == Role::StoreOwner)
            .collect()
    }
}

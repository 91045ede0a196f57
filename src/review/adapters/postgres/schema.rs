//! Diesel schema for review persistence.

diesel::table! {
    /// Teams owning reviewer pools.
    teams (id) {
        /// Team identifier.
        id -> Uuid,
        /// Unique team name.
        #[max_length = 255]
        name -> Varchar,
    }
}

diesel::table! {
    /// Team members.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Unique login name.
        #[max_length = 255]
        username -> Varchar,
        /// Owning team.
        team_id -> Uuid,
        /// Whether the user may be assigned reviews.
        is_active -> Bool,
    }
}

diesel::table! {
    /// Pull requests and their reviewer slots.
    pull_requests (id) {
        /// Pull request identifier.
        id -> Uuid,
        /// Title.
        #[max_length = 255]
        title -> Varchar,
        /// Author.
        author_id -> Uuid,
        /// Lifecycle status (`OPEN` or `MERGED`).
        #[max_length = 16]
        status -> Varchar,
        /// Reviewer slot 1.
        reviewer1_id -> Nullable<Uuid>,
        /// Reviewer slot 2.
        reviewer2_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Merge timestamp.
        merged_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(users -> teams (team_id));
diesel::allow_tables_to_appear_in_same_query!(teams, users, pull_requests);

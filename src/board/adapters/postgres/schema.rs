//! Diesel schema for board persistence.

diesel::table! {
    /// One board per project.
    boards (id) {
        /// Board identifier.
        id -> Uuid,
        /// Owning project; unique.
        project_id -> Uuid,
        /// Board name.
        #[max_length = 100]
        name -> Varchar,
        /// User that caused the board to be created.
        created_by -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Nullable<Timestamptz>,
        /// Column new work items land in by default.
        default_column_id -> Nullable<Uuid>,
        /// Column representing completed work.
        done_column_id -> Nullable<Uuid>,
        /// Free-form UI settings.
        settings -> Nullable<Jsonb>,
    }
}

diesel::table! {
    /// Ordered board columns.
    board_columns (id) {
        /// Column identifier.
        id -> Uuid,
        /// Owning board.
        board_id -> Uuid,
        /// Column name, unique per board ignoring case.
        #[max_length = 100]
        name -> Varchar,
        /// Position, unique per board.
        order_key -> Int4,
        /// Optional display colour.
        #[max_length = 50]
        color -> Nullable<Varchar>,
        /// Optional work-in-progress limit.
        wip_limit -> Nullable<Int4>,
        /// Default target for new work items.
        is_default -> Bool,
        /// Marks completed work for reporting.
        is_done_like -> Bool,
    }
}

diesel::table! {
    /// Work items placed in board columns.
    work_items (id) {
        /// Work item identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Owning board.
        board_id -> Uuid,
        /// Column the item sits in.
        column_id -> Uuid,
        /// Title.
        #[max_length = 200]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Classification such as `Task` or `Bug`.
        #[max_length = 50]
        item_type -> Varchar,
        /// Optional priority, 1 to 5.
        priority -> Nullable<Int2>,
        /// Optional severity, 1 to 5.
        severity -> Nullable<Int2>,
        /// Reporting user.
        reporter_id -> Uuid,
        /// Optional assignee.
        assignee_id -> Nullable<Uuid>,
        /// Position within the column.
        order_key -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(board_columns -> boards (board_id));
diesel::joinable!(work_items -> board_columns (column_id));

diesel::allow_tables_to_appear_in_same_query!(boards, board_columns, work_items);

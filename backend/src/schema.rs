diesel::table! {
    events (id) {
        id -> Uuid,
        title -> Text,
        description -> Nullable<Text>,
        date -> Text,
        time -> Nullable<Text>,
        family_member_id -> Text,
        event_type -> Text,
        is_all_day -> Bool,
        external_calendar_id -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    todos (id) {
        id -> Uuid,
        title -> Text,
        description -> Nullable<Text>,
        completed -> Bool,
        created_by -> Text,
        priority -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    poi_children (id) {
        id -> Text,
        name -> Text,
        total_points -> Int4,
    }
}

diesel::table! {
    poi_records (id) {
        id -> Uuid,
        child_id -> Text,
        task_name -> Text,
        points -> Int4,
        date -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    notifications (id) {
        id -> Uuid,
        kind -> Text,
        title -> Text,
        message -> Text,
        target_id -> Text,
        target_type -> Text,
        created_by -> Text,
        created_at -> Timestamptz,
        is_read -> Bool,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    events,
    todos,
    poi_children,
    poi_records,
    notifications,
);
